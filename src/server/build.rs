//! Le build script.

use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::str;


/// File in the $OUT_DIR where the current revision is written.
const REVISION_FILE: &str = "revision";


fn main() {
    // The revision is passed to the crate code through a file for include_str!(),
    // which has to exist even if Git isn't available.
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => dir,
        Err(e) => {
            println!("cargo:warning=OUT_DIR is not set: {}", e);
            return;
        }
    };
    let rev_path = Path::new(&out_dir).join(REVISION_FILE);

    let revision = git_head_sha().unwrap_or_else(|e| {
        println!("cargo:warning=Failed to obtain current Git SHA: {}", e);
        String::new()
    });
    if let Err(e) = fs::write(&rev_path, revision) {
        println!("cargo:warning=Failed to write {}: {}", rev_path.display(), e);
    }
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

fn git_head_sha() -> Result<String, Box<dyn Error>> {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "--short", "HEAD"]);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err("git rev-parse failed".into());
    }
    let sha = str::from_utf8(&output.stdout[..])?.trim().to_owned();
    Ok(sha)
}
