//! Recompiles the embedded `sqlx::migrate!` set whenever a file under
//! `migrations/` is added or edited.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
