use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("classroom-cli").chain(args.iter().copied())).unwrap()
}

#[test]
fn login_requires_email_and_password() {
    assert!(Cli::try_parse_from(["classroom-cli", "login", "--email", "a@b.test"]).is_err());
    let cli = parse(&["login", "--email", "a@b.test", "--password", "pw"]);
    assert!(matches!(cli.command, Command::Login { ref email, ref password } if email == "a@b.test" && password == "pw"));
}

#[test]
fn register_teacher_id_defaults_to_empty() {
    let cli = parse(&["register", "--email", "a@b.test", "--password", "pw", "--first-name", "A", "--last-name", "B"]);
    match cli.command {
        Command::Register { teacher_id, first_name, .. } => {
            assert_eq!(teacher_id, "");
            assert_eq!(first_name, "A");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_flags_override_defaults() {
    let cli = parse(&[
        "--base-url",
        "https://school.test/api/auth",
        "--state-file",
        "/tmp/s.json",
        "--timeout-secs",
        "5",
        "whoami",
    ]);
    assert_eq!(cli.base_url, "https://school.test/api/auth");
    assert_eq!(cli.state_file, PathBuf::from("/tmp/s.json"));
    assert_eq!(cli.timeout_secs, 5);
    assert!(matches!(cli.command, Command::Whoami));
}

#[test]
fn ensure_success_maps_failures() {
    assert!(ensure_success("login", true, None).is_ok());
    let err = ensure_success("login", false, Some("Invalid credentials".to_owned())).unwrap_err();
    assert_eq!(err.to_string(), "login failed: Invalid credentials");
    let err = ensure_success("logout", false, None).unwrap_err();
    assert_eq!(err.to_string(), "logout failed: unknown error");
}

#[test]
fn build_auth_targets_configured_base_url() {
    let cli = parse(&["--base-url", "http://localhost:9/api/auth/", "session"]);
    let auth = build_auth(&cli).unwrap();
    assert_eq!(auth.gateway().config().endpoint("/login"), "http://localhost:9/api/auth/login");
}

#[test]
fn whoami_json_before_initialize_has_no_user() {
    let state_file = std::env::temp_dir().join(format!("classroom-cli-{}.json", uuid::Uuid::new_v4()));
    let cli = parse(&["--state-file", state_file.to_str().unwrap(), "whoami"]);
    let auth = build_auth(&cli).unwrap();
    assert_eq!(
        whoami_json(&auth, &auth.phase().to_string()),
        json!({ "phase": "initializing", "user": null })
    );
}
