//! Example: Listing a directory with dircursor
//!
//! Usage: `cargo run --example list_dir -- [path]`

use dircursor::fs::{DirHandle, FileType};

#[dircursor::main(blocking_threads = 2)]
async fn main() -> dircursor::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| ".".to_owned());
    let dir = DirHandle::new(path);

    // Read the first entry directly, with a callback
    dir.read_with(|result| {
        if let Ok(Some(entry)) = result {
            println!("first entry: {}", entry.name().to_string_lossy());
        }
    })
    .await?;

    // Iterate over the rest
    let mut entries = dir.entries();
    while let Some(entry) = entries.next().await {
        let entry = entry?;

        let tag = match entry.file_type() {
            FileType::Directory => "dir ",
            FileType::Symlink => "link",
            FileType::RegularFile => "file",
            _ => "    ",
        };

        println!("{} {}", tag, entry.path().display());
    }

    dir.close().await
}
