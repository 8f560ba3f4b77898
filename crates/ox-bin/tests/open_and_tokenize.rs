use core_model::Editor;
use core_search::search_forward;
use core_state::Mode;
use core_syntax::tokenizer_for;

// Integration-adjacent test: exercise the same path main.rs takes to open a
// buffer, tokenize it, and search it, without needing to spawn the binary.
#[test]
fn opens_a_cpp_buffer_and_tokenizes_it() {
    let mut editor = Editor::new();
    let id = editor.open("t.cpp", b"int main() { return 0; }", Mode::cpp());
    let handle = editor.window(id).unwrap().buffer().unwrap();

    let tokenizer = tokenizer_for(handle.buffer().mode.tokenizer);
    let mut cache = handle.token_cache();
    let first = cache.get_token_after_position(&handle.buffer(), tokenizer, 0);
    assert!(first.is_some());
}

#[test]
fn search_forward_finds_a_later_occurrence() {
    let mut editor = Editor::new();
    let id = editor.open("t", b"alpha beta alpha", Mode::plaintext());
    let handle = editor.window(id).unwrap().buffer().unwrap();

    let buffer = handle.buffer();
    let mut it = buffer.contents.start();
    it.advance(1); // start past the first "alpha"
    assert!(search_forward(&mut it, b"alpha"));
    assert_eq!(it.position, 11);
}

#[test]
fn search_forward_reports_a_miss() {
    let mut editor = Editor::new();
    let id = editor.open("t", b"alpha beta", Mode::plaintext());
    let handle = editor.window(id).unwrap().buffer().unwrap();

    let buffer = handle.buffer();
    let mut it = buffer.contents.start();
    assert!(!search_forward(&mut it, b"gamma"));
}
