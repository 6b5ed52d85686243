// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_story(size: usize) -> String {
    let base = "# Chapter\n\n## Scene\n\nA paragraph with **bold**, *italic* and `code` plus a [link](https://example.com).\n\n- First point\n- Second point\n\n1. One\n2. Two\n\n> A quotation\n\n```\nfn example() {}\n```\n\n";
    base.repeat(size)
}
