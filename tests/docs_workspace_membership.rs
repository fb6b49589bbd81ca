use std::fs;

#[test]
fn docs_mention_every_workspace_crate() {
    let root = env!("CARGO_MANIFEST_DIR");
    let cargo =
        fs::read_to_string(format!("{root}/Cargo.toml")).expect("Failed to read Cargo.toml");
    let readme =
        fs::read_to_string(format!("{root}/README.md")).expect("Failed to read README.md");

    for member in ["webmime-core", "webmime-cli"] {
        assert!(
            cargo.contains(&format!("crates/{member}")),
            "Cargo.toml workspace members must include crates/{member}"
        );
        assert!(
            readme.contains(member),
            "README.md must mention {member} to match workspace membership"
        );

        let crate_readme = format!("crates/{member}/README.md");
        let content = fs::read_to_string(format!("{root}/{crate_readme}"))
            .unwrap_or_else(|_| panic!("Failed to read {crate_readme}"));
        assert!(
            content.contains(member),
            "{crate_readme} must name its crate"
        );
    }
}
