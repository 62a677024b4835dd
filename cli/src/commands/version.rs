//! Version command

/// Run the version command.
pub fn run(json: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if json {
        println!("{}", serde_json::json!({ "version": version }));
    } else {
        println!("dabk {version}");
    }
}
