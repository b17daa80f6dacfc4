use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TOOLS_SHEET: &str = "ID (Nombre),Tipo de herramienta,Categoría,Descripción,Casos de uso
Zabbix,Open source,Monitoreo,Monitoreo de red,Alertas
GLPI,Open source,ITSM,Inventario,Tickets
";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn tool_ids(path: &PathBuf) -> Vec<String> {
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).expect("output written")).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn activities_command_writes_hierarchy() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(
        &dir,
        "actividades.csv",
        "Codigo OGG,Objetivo,ID Practica,Practica,Actividad,Herramienta,\
         Justificacion Tecnica,Observaciones,Integracion\n\
         EDM01,Gobierno,EDM01.01,Evaluar,1. Revisar,GLPI,Inventario,,\n",
    );
    let output = dir.path().join("actividades.json");

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path())
        .arg("activities")
        .arg(&input)
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("JSON written to")
                .and(predicate::str::contains("(1 objectives)")),
        );

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"EDM01-P01-A01\""));
    assert!(json.contains("\"nivel_capacidad\": null"));
}

#[test]
fn tools_command_sorts_unless_told_to_keep_order() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "herramientas.csv", TOOLS_SHEET);
    let output = dir.path().join("herramientas.json");

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path()).arg("tools").arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(2 tools)"));
    assert_eq!(tool_ids(&output), vec!["GLPI", "Zabbix"]);

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path())
        .arg("tools")
        .arg(&input)
        .arg(&output)
        .arg("--keep-order");
    cmd.assert().success();
    assert_eq!(tool_ids(&output), vec!["Zabbix", "GLPI"]);
}

#[test]
fn local_config_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "herramientas.csv", TOOLS_SHEET);
    write_fixture(&dir, "govsheet.toml", "[tools]\nsort_by_id = false\n");
    let output = dir.path().join("herramientas.json");

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path()).arg("tools").arg(&input).arg(&output);
    cmd.assert().success();
    assert_eq!(tool_ids(&output), vec!["Zabbix", "GLPI"]);

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path())
        .arg("--sort-by-id")
        .arg("tools")
        .arg(&input)
        .arg(&output);
    cmd.assert().success();
    assert_eq!(tool_ids(&output), vec!["GLPI", "Zabbix"]);
}

#[test]
fn objectives_command_writes_id_map() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(
        &dir,
        "objetivos.csv",
        "ID objetivo,Objetivo,Descripción del objetivo,\
         Declaración de propósito objetivo,Herramientas\n\
         EDM01,Gobierno,Asegurar,Valor,GLPI; Zabbix\n",
    );
    let output = dir.path().join("objetivos.json");
    let by_id = dir.path().join("objetivos_por_id.json");

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path())
        .arg("objectives")
        .arg(&input)
        .arg(&output)
        .arg("--by-id")
        .arg(&by_id);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("; by id:"));

    let map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&by_id).unwrap()).unwrap();
    assert_eq!(map["EDM01"]["herramientas"], serde_json::json!(["GLPI", "Zabbix"]));
}

#[test]
fn missing_columns_fail_with_exit_code_one() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "herramientas.csv", "Nombre,Tipo\nGLPI,Open source\n");
    let output = dir.path().join("herramientas.json");

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path()).arg("tools").arg(&input).arg(&output);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("missing required columns")
                .and(predicate::str::contains("use_cases")),
        );
    assert!(!output.exists());
}

#[test]
fn unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "herramientas.pdf", "not a sheet");

    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path())
        .arg("tools")
        .arg(&input)
        .arg(dir.path().join("out.json"));

    cmd.assert().failure().code(1).stderr(predicate::str::contains("pdf"));
}

#[test]
fn columns_command_lists_synonyms() {
    let dir = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.current_dir(dir.path()).arg("columns");

    cmd.assert().success().stdout(
        predicate::str::contains("capability (optional)")
            .and(predicate::str::contains("Codigo OGG"))
            .and(predicate::str::contains("ID (Nombre)"))
            .and(predicate::str::contains("Input readers"))
            .and(predicate::str::contains("csv (.csv)"))
            .and(predicate::str::contains("spreadsheet (.xlsx, .xlsm, .xlsb, .xls, .ods)")),
    );
}

#[test]
fn order_flags_conflict() {
    let mut cmd = cargo_bin_cmd!("govsheet");
    cmd.arg("tools")
        .arg("a.csv")
        .arg("b.json")
        .arg("--sort-by-id")
        .arg("--keep-order");

    cmd.assert().failure();
}
