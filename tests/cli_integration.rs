// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the inventario CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with an isolated config file and no inherited settings
fn inventario(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("inventario").unwrap();
    cmd.env_remove("INVENTARIO_API_URL")
        .env_remove("INVENTARIO_DARK_MODE")
        .env_remove("INVENTARIO_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .env("INVENTARIO_CONFIG", config_path(config_dir))
        .arg("--no-color");
    cmd
}

fn config_path(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    if !path.exists() {
        std::fs::write(&path, "").unwrap();
    }
    path
}

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;
    let estacion = json!({
        "_id": "E1", "nombre": "Central", "ubicacion": "Santiago",
        "tipo": "CENTRAL", "estado": "activa"
    });
    let bodega = json!({
        "_id": "B1", "nombre": "Bodega Norte",
        "estacion": { "_id": "E1", "nombre": "Central" }, "racks": ["R1"]
    });
    let rack = json!({
        "_id": "R1", "nombre": "Rack A", "ubicacion": "Pasillo 1",
        "categorias": ["Herramientas"], "bodega": "B1"
    });
    let productos = json!([
        {
            "_id": "P1", "nombre": "Martillo", "cantidad": 12, "precio": 8990,
            "categoria": "Herramientas",
            "estacion": { "_id": "E1" }, "bodega": { "_id": "B1" }, "rack": { "_id": "R1" }
        },
        {
            "_id": "P2", "nombre": "Guantes", "cantidad": 40, "precio": 1500,
            "categoria": "Seguridad",
            "estacion": { "_id": "E1" }, "bodega": { "_id": "B1" }, "rack": { "_id": "R1" }
        }
    ]);

    for (route, body) in [
        ("/api/estaciones", json!([estacion])),
        ("/api/bodegas", json!([bodega])),
        ("/api/racks", json!([rack])),
        ("/api/products", productos),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    server
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["config", "api_url", "http://inventario.local:8080/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url"));

    inventario(&dir)
        .args(["config", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://inventario.local:8080"));

    inventario(&dir)
        .args(["config", "dark_mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    inventario(&dir)
        .args(["config", "tema", "oscuro"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Clave desconocida"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    inventario(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inventario"));
}

#[test]
fn test_categorias() {
    let dir = TempDir::new().unwrap();
    inventario(&dir)
        .arg("categorias")
        .assert()
        .success()
        .stdout(predicate::str::contains("Herramientas"))
        .stdout(predicate::str::contains("Productos Frágiles"));

    inventario(&dir)
        .args(["categorias", "racks", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"racks\""))
        .stdout(predicate::str::contains("\"productos\"").not());
}

#[test]
fn test_unknown_action() {
    let dir = TempDir::new().unwrap();
    inventario(&dir)
        .args(["rack", "explode", "--api-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Acción desconocida"));
}

#[test]
fn test_unreachable_service_fails() {
    let dir = TempDir::new().unwrap();
    inventario(&dir)
        .args(["estacion", "list", "--api-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error al cargar"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_productos_filter_and_link() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["productos", "--api-url", &server.uri(), "--busqueda", "segur"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Guantes"))
        .stdout(predicate::str::contains("Martillo").not())
        .stdout(predicate::str::contains("productos?busqueda=segur"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_productos_restores_link() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args([
            "productos",
            "--api-url",
            &server.uri(),
            "--link",
            "productos?rack=R1&categoria=herramientas",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Martillo"))
        .stdout(predicate::str::contains("Bodega Norte (Central), Rack A"))
        .stdout(predicate::str::contains("Guantes").not());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_inventario_tree() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["inventario", "--api-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Central"))
        .stdout(predicate::str::contains("Bodega Norte").not());

    inventario(&dir)
        .args(["inventario", "--api-url", &server.uri(), "--expand-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rack A"))
        .stdout(predicate::str::contains("Guantes"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rack_show_lists_products() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["rack", "show", "Rack A", "--api-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Productos (2)"))
        .stdout(predicate::str::contains("$8.990"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_with_yes() {
    let server = mock_service().await;
    Mock::given(method("DELETE"))
        .and(path("/api/racks/R1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["rack", "delete", "R1", "--yes", "--api-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rack eliminado correctamente"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_declined() {
    let server = mock_service().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["producto", "delete", "Martillo", "--api-url", &server.uri()])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelado"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_missing_field_fails() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();

    inventario(&dir)
        .args(["bodega", "create", "--estacion", "E1", "--api-url", &server.uri()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nombre"));
}
