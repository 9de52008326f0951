// Shared by several bench targets; each target only uses part of it.
#[allow(dead_code)]
pub fn generate_note(repeats: usize) -> String {
    let base = "# Weekly review\n\nNotes on [[Plan]] with **bold** and `code`.\n\n- [ ] follow up start:2024-06-01\n    - sub point #work\n- [x] done\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n| a | b |\n| --- | --- |\n| 1 | 2 |\n\n";
    base.repeat(repeats)
}

/// `count` list lines nested in a saw-tooth up to `depth` levels.
#[allow(dead_code)]
pub fn generate_list(count: usize, depth: usize) -> String {
    (0..count)
        .map(|i| format!("{}- item {i}", "    ".repeat(i % depth)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line of `count` openers that never close.
#[allow(dead_code)]
pub fn generate_unclosed(count: usize) -> String {
    "**a [[b `c ".repeat(count)
}
