pub mod fixtures;

use fixtures::*;
use gedx_codec::{Absorbed, CodecError};
use gedx_codec::prelude::*;
use gedx_domain::{Scalar, XML_NAMESPACE};
use serde_json::json;

#[test]
fn test_unregistered_extensions_fall_back_to_generic_elements() {
    let codec = ExtensionCodec::new(registry());
    let raw = json!({ "id": "p1", "tags": [{ "a": 1 }, { "a": 2 }] });

    let person: Person = codec.from_value(raw.clone()).unwrap();
    let elements = person.extensions.elements();
    assert_eq!(elements.len(), 2);
    for element in elements {
        let generic = element.as_generic().expect("generic element");
        assert_eq!(generic.name.namespace(), "");
        assert_eq!(generic.name.local_name(), "tags");
    }
    assert!(person.extensions.unrecognized().is_empty());

    assert_eq!(codec.to_value(&person).unwrap(), raw);
}

#[test]
fn test_registered_extensions_round_trip() {
    let codec = ExtensionCodec::new(registry());

    let mut person = Person { id: "p1".into(), ..Person::default() };
    person.extensions.add_model(Note { text: "first".into() });
    person.extensions.add_model(address(Some("home"), "Provo"));
    person.extensions.add_model(link(Some("alt"), "https://a"));
    person.extensions.add_model(Note { text: "second".into() });
    person.extensions.add_model(link(None, "https://b"));
    person.extensions.add_model(link(Some("alt"), "https://c"));
    person.extensions.add_model(Rating { stars: 5 });
    person.extensions.set_attribute(QualifiedName::new(XML_NAMESPACE, "lang").unwrap(), "en");
    person.extensions.set_attribute(QualifiedName::new(EXT_NS, "confidence").unwrap(), 3_i64);

    let wire_value = codec.to_value(&person).unwrap();
    assert_eq!(
        wire_value,
        json!({
            "id": "p1",
            "http://www.w3.org/XML/1998/namespace#lang": "en",
            wire("confidence"): 3,
            wire("notes"): [{ "text": "first" }, { "text": "second" }],
            wire("addresses"): { "home": { "city": "Provo" } },
            wire("links"): { "alt": [{ "href": "https://a" }, { "href": "https://c" }], "$": [{ "href": "https://b" }] },
            wire("rating"): [{ "stars": 5 }],
        })
    );

    let back: Person = codec.from_json(&wire_value.to_string()).unwrap();
    let ext = &back.extensions;
    assert_eq!(ext.elements().len(), 7);
    assert_eq!(ext.attributes().len(), 2);
    assert_eq!(
        ext.attribute(&QualifiedName::new(XML_NAMESPACE, "lang").unwrap()),
        Some(&Scalar::String("en".into()))
    );
    assert_eq!(ext.attribute(&QualifiedName::new(EXT_NS, "confidence").unwrap()), Some(&Scalar::from(3_i64)));

    let notes: Vec<_> = ext.find_extensions_of_type::<Note>().into_iter().map(|n| n.text.as_str()).collect();
    assert_eq!(notes, ["first", "second"]);
    assert_eq!(ext.find_extension_of_type::<Address>(), Some(&address(Some("home"), "Provo")));
    assert_eq!(
        ext.find_extensions_of_type::<Link>(),
        [&link(Some("alt"), "https://a"), &link(Some("alt"), "https://c"), &link(None, "https://b")]
    );
    assert_eq!(ext.find_extension_of_type::<Rating>(), Some(&Rating { stars: 5 }));

    // Grouping is stable, so a second pass writes the same document.
    assert_eq!(codec.to_value(&back).unwrap(), wire_value);
}

#[test]
fn test_single_registered_value_is_accepted_bare() {
    let codec = ExtensionCodec::new(registry());
    let raw = json!({ "id": "p1", wire("notes"): { "text": "solo" } });

    let person: Person = codec.from_value(raw).unwrap();
    assert_eq!(person.extensions.find_extension_of_type::<Note>(), Some(&Note { text: "solo".into() }));

    let out = codec.to_value(&person).unwrap();
    assert_eq!(out[wire("notes")], json!([{ "text": "solo" }]));
}

#[test]
fn test_non_extensible_host_discards_content() {
    let codec = ExtensionCodec::new(registry());
    let mut sealed = Sealed { id: "s1".into() };

    assert_eq!(codec.absorb(&mut sealed, "tags", json!([1, 2])).unwrap(), Absorbed::Discarded);
    assert_eq!(codec.absorb(&mut sealed, "lang", json!("en")).unwrap(), Absorbed::Discarded);
    assert_eq!(codec.to_value(&sealed).unwrap(), json!({ "id": "s1" }));
}

#[test]
fn test_absorb_reports_element_counts() {
    let codec = ExtensionCodec::new(registry());
    let mut person = Person::default();

    let absorbed = codec
        .absorb(&mut person, &wire("links"), json!({ "alt": [{ "href": "x" }, { "href": "y" }] }))
        .unwrap();
    assert_eq!(absorbed, Absorbed::Elements(2));
    assert_eq!(person.extensions.find_extensions_of_type::<Link>().len(), 2);
}

#[test]
fn test_keyed_uniqueness_violation_aborts_encoding() {
    let codec = ExtensionCodec::new(registry());
    let mut person = Person { id: "p1".into(), ..Person::default() };
    person.extensions.add_model(address(Some("home"), "Provo"));
    person.extensions.add_model(address(Some("home"), "Orem"));

    let err = codec.to_value(&person).unwrap_err();
    assert!(
        matches!(err, CodecError::UniquenessViolation { ref key, count: 2, .. } if key == "home"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_malformed_keyed_extension_is_rejected() {
    let codec = ExtensionCodec::new(registry());
    let raw = json!({ "id": "p1", wire("addresses"): [{ "city": "Provo" }] });

    let result = codec.from_value::<Person>(raw);
    assert!(matches!(result, Err(CodecError::MalformedKeyedInput { .. })));
}

#[test]
fn test_declared_fields_shadow_extensions() {
    let codec = ExtensionCodec::new(registry());
    let mut person = Person { id: "p1".into(), name: Some("Ann".into()), ..Person::default() };
    person
        .extensions
        .add_element(ExtensionElement::generic(QualifiedName::local("name").unwrap(), json!("shadow")));

    let out = codec.to_value(&person).unwrap();
    assert_eq!(out, json!({ "id": "p1", "name": "Ann" }));
}

#[test]
fn test_generic_and_typed_values_sharing_a_name_become_one_array() {
    let codec = ExtensionCodec::new(registry());
    let mut person = Person { id: "p1".into(), ..Person::default() };
    person.extensions.add_model(Note { text: "typed".into() });
    person.extensions.add_element(ExtensionElement::generic(
        QualifiedName::new(EXT_NS, "notes").unwrap(),
        json!({ "raw": true }),
    ));

    let out = codec.to_value(&person).unwrap();
    assert_eq!(out[wire("notes")], json!([{ "text": "typed" }, { "raw": true }]));
}

#[test]
fn test_generic_values_under_a_keyed_name_keep_the_object_shape() {
    let codec = ExtensionCodec::new(registry());
    let mut person = Person { id: "p1".into(), ..Person::default() };
    person.extensions.add_model(address(Some("home"), "Provo"));
    person.extensions.add_element(ExtensionElement::generic(
        QualifiedName::new(EXT_NS, "addresses").unwrap(),
        json!({ "city": "Orem" }),
    ));

    let out = codec.to_value(&person).unwrap();
    assert_eq!(out[wire("addresses")], json!({ "home": { "city": "Provo" }, "$": [{ "city": "Orem" }] }));

    let back: Person = codec.from_value(out).unwrap();
    assert_eq!(
        back.extensions.find_extensions_of_type::<Address>(),
        [&address(Some("home"), "Provo"), &address(None, "Orem")]
    );
}

#[test]
fn test_generic_values_alone_under_a_keyed_name_decode_back() {
    let codec = ExtensionCodec::new(registry());
    let mut person = Person { id: "p1".into(), ..Person::default() };
    person.extensions.add_element(ExtensionElement::generic(
        QualifiedName::new(EXT_NS, "addresses").unwrap(),
        json!({ "city": "Orem" }),
    ));

    let out = codec.to_value(&person).unwrap();
    assert_eq!(out[wire("addresses")], json!({ "$": [{ "city": "Orem" }] }));

    let back: Person = codec.from_value(out).unwrap();
    assert_eq!(back.extensions.find_extension_of_type::<Address>(), Some(&address(None, "Orem")));
}

#[test]
fn test_empty_property_name_is_discarded() {
    let codec = ExtensionCodec::new(registry());

    let person: Person = codec.from_value(json!({ "id": "p1", "": 1, "tags": [{ "a": 1 }] })).unwrap();
    assert!(person.extensions.attributes().is_empty());
    assert_eq!(person.extensions.elements().len(), 1);

    let mut person = Person::default();
    assert_eq!(codec.absorb(&mut person, "", json!({ "a": 1 })).unwrap(), Absorbed::Discarded);
    assert_eq!(codec.absorb(&mut person, "", json!("scalar")).unwrap(), Absorbed::Discarded);
    assert!(person.extensions.is_empty());
}
