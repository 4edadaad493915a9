pub mod fixtures;

use fixtures::*;
use gedx_codec::config::RegistryConfig;
use gedx_codec::prelude::*;
use gedx_codec::registry::discovery::scan_markers;
use std::any::type_name;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_marker(root: &Path, module: &str, content: &[u8]) {
    let dir = root.join(module).join("META-INF");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("gedx.models"), content).unwrap();
}

#[test]
fn test_discovery_registers_listed_types() {
    let root = TempDir::new().unwrap();
    let marker = format!(
        "# core models\n{}\n\n{}\ndoes::not::Exist\n",
        type_name::<Note>(),
        type_name::<Address>()
    );
    write_marker(root.path(), "core", marker.as_bytes());
    write_marker(root.path(), "plugins/links", format!("{}\n", type_name::<Link>()).as_bytes());

    let config = RegistryConfig::with_roots([root.path()]);
    let registry = RegistryBuilder::new().discover(&catalogue(), &config).build();

    assert_eq!(registry.descriptors().len(), 3);
    assert!(registry.resolve_by_type::<Note>().is_some());
    assert!(registry.resolve_by_type::<Link>().is_some_and(TypeDescriptor::is_keyed));
    assert!(registry.resolve_by_type::<Rating>().is_none());
    assert_eq!(registry.preferred_prefix(EXT_NS, true), Some("ex"));
}

#[test]
fn test_unreadable_markers_are_skipped() {
    let root = TempDir::new().unwrap();
    write_marker(root.path(), "broken", &[0xff, 0xfe, 0x00]);
    write_marker(root.path(), "good", format!("{}\n", type_name::<Rating>()).as_bytes());

    let config = RegistryConfig::with_roots([root.path()]);
    let entries = scan_markers(&config);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].line, 1);

    let registry = RegistryBuilder::new().discover(&catalogue(), &config).build();
    assert!(registry.resolve_by_type::<Rating>().is_some());
}

#[test]
fn test_scan_depth_is_bounded() {
    let root = TempDir::new().unwrap();
    write_marker(root.path(), "a/b/c", format!("{}\n", type_name::<Note>()).as_bytes());

    let shallow = RegistryConfig { max_depth: 2, ..RegistryConfig::with_roots([root.path()]) };
    assert!(scan_markers(&shallow).is_empty());

    let deep = RegistryConfig { max_depth: 5, ..shallow };
    assert_eq!(scan_markers(&deep).len(), 1);
}

#[test]
fn test_config_applies_prefixes_and_default_namespace() {
    let config = RegistryConfig {
        roots: vec![],
        default_namespace: Some(EXT_NS.to_owned()),
        prefixes: vec![gedx_codec::config::PrefixBinding {
            namespace: "urn:gedx:custom#".to_owned(),
            prefix: "c".to_owned(),
        }],
        ..RegistryConfig::default()
    };

    let registry = RegistryBuilder::new().register_type::<Note>().discover(&catalogue(), &config).build();

    assert_eq!(registry.default_namespace(), Some(EXT_NS));
    assert_eq!(registry.preferred_prefix(EXT_NS, false), Some(""));
    assert_eq!(registry.preferred_prefix(EXT_NS, true), Some("ex"));
    assert_eq!(registry.preferred_prefix("urn:gedx:custom#", false), Some("c"));
    assert!(registry.known_namespaces().iter().any(|ns| ns == "urn:gedx:custom#"));
}

#[test]
fn test_lookups_by_wire_name_and_type_id() {
    let registry = registry();

    let note = registry.resolve_by_wire_name(&wire("notes")).unwrap();
    assert_eq!(note.identifier().local_name(), "note");
    assert_eq!(registry.wire_name_of::<Note>(), Some(wire("notes").as_str()));

    let rating_id = QualifiedName::new(EXT_NS, "rating").unwrap();
    let rating = registry.resolve_by_type_id(&rating_id).unwrap();
    assert_eq!(rating.wire_name(), None);
    assert_eq!(rating.property_name(), wire("rating"));

    assert!(registry.resolve_by_wire_name(&wire("rating")).is_none());
}

#[test]
fn test_known_namespaces_are_longest_first() {
    let registry = RegistryBuilder::new()
        .register_type::<Note>()
        .prefix("http://gedx.example.org/", "root")
        .build();

    let namespaces = registry.known_namespaces();
    let lengths: Vec<_> = namespaces.iter().map(String::len).collect();
    assert!(lengths.windows(2).all(|pair| pair[0] >= pair[1]));

    let name = registry.decode_name("http://gedx.example.org/ext/thing").unwrap();
    assert_eq!(name.namespace(), EXT_NS);
}
