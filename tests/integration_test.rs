use std::io::Write;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use short_sign::{
    AsyncCredentialLookup, Credential, CredentialLookup, Lookup, encode, encode_at, find_one,
    find_one_async, find_one_at,
};
use short_sign_cli::configuration::Config;
use short_sign_cli::directory::CredentialStore;
use tokio::sync::RwLock;

const CONFIG: &str = r#"
layout:
  timestamp: 6
  id: 8
  checksum: 6
hash: sha256
hmac: true
expires_in: 120
"#;

const CREDENTIALS: &str = r#"
credentials:
  - id: 1001
    secret: "old-secret"
  - id: 1001
    secret: "new-secret"
  - id: 2002
    secret: 424242
"#;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Store behind an async lock, as a service refreshing credentials would hold it.
struct SharedStore(Arc<RwLock<CredentialStore>>);

#[async_trait]
impl AsyncCredentialLookup for SharedStore {
    async fn lookup(&self, id: &str) -> Lookup {
        self.0.read().await.lookup(id)
    }
}

#[test]
fn test_config_and_store_pipeline() {
    let conf = write_temp(CONFIG);
    let creds = write_temp(CREDENTIALS);
    let config = Config::load(conf.path()).unwrap();
    let store = CredentialStore::load(creds.path()).unwrap();

    let issued_at = 1_700_400_000;
    let signed = encode_at(
        &Credential::new(1001, "new-secret"),
        &config.sign_config(),
        issued_at,
    )
    .unwrap();
    assert_eq!(signed.token.len(), 20);

    let verify = config.verify_config(None);
    let found = find_one_at(&signed.token, &verify, &store, issued_at + 90)
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(found.unwrap().secret(), "new-secret");

    // Past the configured 120 second window.
    let found = find_one_at(&signed.token, &verify, &store, issued_at + 120)
        .unwrap()
        .into_ready()
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn test_numeric_secret_from_yaml() {
    let store = CredentialStore::from_yaml(CREDENTIALS).unwrap();
    let config = Config::from_yaml(CONFIG).unwrap();

    let signed = encode(&Credential::new(2002, 424242), &config.sign_config()).unwrap();
    let found = find_one(&signed.token, &config.verify_config(None), &store)
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(found.unwrap().id(), "2002");
}

#[tokio::test]
async fn test_async_store_sees_rotation() {
    let config = Config::from_yaml(CONFIG).unwrap();
    let shared = Arc::new(RwLock::new(CredentialStore::from_yaml(CREDENTIALS).unwrap()));
    let directory = SharedStore(shared.clone());

    let signed = encode(&Credential::new(1001, "old-secret"), &config.sign_config()).unwrap();
    let verify = config.verify_config(None);
    let found = find_one_async(&signed.token, &verify, &directory).await.unwrap();
    assert!(found.is_some());

    // Revoke every secret for the id.
    shared.write().await.remove("1001");
    let found = find_one_async(&signed.token, &verify, &directory).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_deferred_lookup_from_sync_entry_point() {
    let config = Config::from_yaml(CONFIG).unwrap();
    let shared = Arc::new(RwLock::new(CredentialStore::from_yaml(CREDENTIALS).unwrap()));

    let directory = {
        let shared = shared.clone();
        move |id: &str| {
            let shared = shared.clone();
            let id = id.to_string();
            Lookup::pending(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                shared.read().await.lookup(&id)
            })
        }
    };

    let signed = encode(&Credential::new(2002, "424242"), &config.sign_config()).unwrap();
    let verification = find_one(&signed.token, &config.verify_config(None), &directory).unwrap();
    assert!(verification.is_pending());
    assert!(verification.resolve().await.unwrap().is_some());
}

#[test]
fn test_cli_encode_and_verify() {
    let conf = write_temp(CONFIG);
    let creds = write_temp(CREDENTIALS);
    let bin = env!("CARGO_BIN_EXE_short-sign");

    let output = Command::new(bin)
        .args(["--conf", conf.path().to_str().unwrap()])
        .args(["encode", "--id", "1001", "--secret", "new-secret"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let token = String::from_utf8(output.stdout).unwrap().trim().to_string();
    assert_eq!(token.len(), 20);

    let output = Command::new(bin)
        .args(["--conf", conf.path().to_str().unwrap()])
        .args(["verify", &token, "--credentials", creds.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "valid id=1001");

    let output = Command::new(bin)
        .args(["--conf", conf.path().to_str().unwrap()])
        .args(["decode", &token])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("id=1001 "));

    let output = Command::new(bin)
        .args(["--conf", conf.path().to_str().unwrap()])
        .args(["decode", "123"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let output = Command::new(bin)
        .args(["encode", "--id", "12a", "--secret", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
