//! Unit tests for the file chooser bridge's exactly-once delivery.

use std::cell::RefCell;
use std::rc::Rc;

use weblauncher::services::file_chooser::*;

#[derive(Clone, Default)]
struct RecordingChooser {
    launched: Rc<RefCell<Vec<FileChooserRequest>>>,
}

impl FileChooser for RecordingChooser {
    fn launch(&mut self, request: &FileChooserRequest) {
        self.launched.borrow_mut().push(request.clone());
    }
}

type Answers = Rc<RefCell<Vec<Vec<String>>>>;

fn callback(answers: &Answers) -> FileChooserCallback {
    let answers = answers.clone();
    Box::new(move |selection| answers.borrow_mut().push(selection))
}

fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_single_selection_is_truncated() {
    let chooser = RecordingChooser::default();
    let mut bridge = FileChooserBridge::new(Box::new(chooser.clone()));
    let answers = Answers::default();

    bridge.request(callback(&answers), false, &files(&["image/png"]));
    assert!(bridge.has_pending());
    assert!(bridge.complete(files(&["a.png", "b.png"])));

    assert_eq!(*answers.borrow(), vec![files(&["a.png"])]);
    assert!(!bridge.has_pending());
    assert!(!bridge.complete(files(&["late.png"])));
    assert_eq!(chooser.launched.borrow().len(), 1);
}

#[test]
fn test_multiple_selection_is_kept() {
    let mut bridge = FileChooserBridge::new(Box::new(RecordingChooser::default()));
    let answers = Answers::default();
    bridge.request(callback(&answers), true, &[]);
    bridge.complete(files(&["a", "b", "c"]));
    assert_eq!(answers.borrow()[0].len(), 3);
}

#[test]
fn test_blank_types_become_wildcard() {
    let chooser = RecordingChooser::default();
    let mut bridge = FileChooserBridge::new(Box::new(chooser.clone()));
    let answers = Answers::default();

    let request = bridge.request(callback(&answers), false, &files(&["", "  "]));
    assert_eq!(request.accept_types, files(&["*/*"]));

    bridge.cancel();
    let request = bridge.request(callback(&answers), true, &files(&[" text/plain ", ""]));
    assert_eq!(request.accept_types, files(&["text/plain"]));
    assert_eq!(chooser.launched.borrow()[1], request);
}

#[test]
fn test_new_request_answers_previous_with_empty() {
    let mut bridge = FileChooserBridge::new(Box::new(RecordingChooser::default()));
    let first = Answers::default();
    let second = Answers::default();

    bridge.request(callback(&first), false, &[]);
    bridge.request(callback(&second), false, &[]);
    assert_eq!(*first.borrow(), vec![Vec::<String>::new()]);
    assert!(second.borrow().is_empty());

    bridge.complete(files(&["doc.pdf"]));
    assert_eq!(*second.borrow(), vec![files(&["doc.pdf"])]);
    assert_eq!(first.borrow().len(), 1);
}

#[test]
fn test_cancel_and_drop_answer_empty() {
    let answers = Answers::default();
    {
        let mut bridge = FileChooserBridge::new(Box::new(RecordingChooser::default()));
        bridge.request(callback(&answers), false, &[]);
        assert!(bridge.cancel());
        assert!(!bridge.cancel());

        bridge.request(callback(&answers), false, &[]);
    }
    assert_eq!(*answers.borrow(), vec![Vec::<String>::new(), Vec::new()]);
}
