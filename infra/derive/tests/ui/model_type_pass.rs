use gedx_derive::model_type;
use gedx_domain::ModelType;

#[model_type(namespace = "http://example.org/ns/", wrapper = "notes", prefix = "ex")]
pub struct Note {
    pub note_text: String,
}

#[model_type(namespace = "http://example.org/ns/", name = "mark")]
#[derive(Clone, PartialEq)]
pub struct Marker {
    pub value: u32,
}

fn main() {
    assert_eq!(Note::NAMESPACE, "http://example.org/ns/");
    assert_eq!(Note::WRAPPER, Some("notes"));
    assert_eq!(Note::PREFIX, Some("ex"));
    assert_eq!(Note::NAME, None);
    assert_eq!(Marker::NAME, Some("mark"));

    let json = serde_json::to_value(Note { note_text: "hi".into() }).unwrap();
    assert_eq!(json, serde_json::json!({ "noteText": "hi" }));
}
