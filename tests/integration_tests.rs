//! End-to-end tests of the document API: parsing real-looking files,
//! editing values in place, and round-tripping typed data.

use serde::{Deserialize, Serialize};
use serde_succ::{from_str, succ, to_string, Document, FileStyle, Value};

const GAME_CONFIG: &str = "\
# graphics
resolution:
  width: 1920 # pixels
  height: 1080
vsync: true

# audio
volume: 0.8
muted: false

mods:
  - base
  - extra_maps";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Resolution {
    width: u32,
    height: u32,
}

#[test]
fn parse_and_read_typed_values() {
    let doc = Document::parse(GAME_CONFIG).unwrap();
    assert_eq!(
        doc.get::<Resolution>("resolution").unwrap(),
        Resolution {
            width: 1920,
            height: 1080
        }
    );
    assert!(doc.get::<bool>("vsync").unwrap());
    assert_eq!(doc.get::<f64>("volume").unwrap(), 0.8);
    assert_eq!(
        doc.get::<Vec<String>>("mods").unwrap(),
        vec!["base", "extra_maps"]
    );
}

#[test]
fn parse_serialize_is_identity() {
    let doc = Document::parse(GAME_CONFIG).unwrap();
    assert_eq!(doc.to_text(), GAME_CONFIG);
}

#[test]
fn editing_one_value_leaves_the_rest_untouched() {
    let mut doc = Document::parse(GAME_CONFIG).unwrap();
    doc.set(
        "resolution",
        &Resolution {
            width: 1280,
            height: 720,
        },
    )
    .unwrap();
    doc.set("volume", &0.5).unwrap();

    let expected = GAME_CONFIG
        .replace("width: 1920 # pixels", "width: 1280 # pixels")
        .replace("height: 1080", "height: 720")
        .replace("volume: 0.8", "volume: 0.5");
    assert_eq!(doc.to_text(), expected);
}

#[test]
fn new_keys_append_at_the_end() {
    let mut doc = Document::parse("a: 1").unwrap();
    doc.set("b", &2).unwrap();
    assert_eq!(doc.to_text(), "a: 1\nb: 2");
    assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn document_key_inventory() {
    let doc = Document::parse(GAME_CONFIG).unwrap();
    assert_eq!(doc.len(), 5);
    assert!(doc.contains_key("vsync"));
    assert!(!doc.contains_key("missing"));
    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        ["resolution", "vsync", "volume", "muted", "mods"]
    );
}

#[test]
fn missing_key_is_an_error() {
    let doc = Document::parse("a: 1").unwrap();
    let err = doc.get::<i32>("b").unwrap_err();
    assert!(err.to_string().contains("b"), "{err}");
}

#[test]
fn nested_structures_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Profile {
        name: String,
        scores: Vec<i32>,
        address: Address,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    let profile = Profile {
        name: "Sam".to_string(),
        scores: vec![10, 20, 30],
        address: Address {
            city: "Springfield".to_string(),
            zip: None,
        },
    };

    let mut doc = Document::new();
    doc.set("profile", &profile).unwrap();
    assert_eq!(doc.get::<Profile>("profile").unwrap(), profile);
    assert_eq!(
        doc.to_text(),
        "profile:\n  name: Sam\n  scores:\n    - 10\n    - 20\n    - 30\n  address:\n    city: Springfield\n    zip: null"
    );
}

#[test]
fn lists_of_structs() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Item {
        name: String,
        count: u32,
    }

    let items = vec![
        Item {
            name: "sword".to_string(),
            count: 1,
        },
        Item {
            name: "potion".to_string(),
            count: 5,
        },
    ];

    let mut doc = Document::new();
    doc.set("inventory", &items).unwrap();
    assert_eq!(
        doc.to_text(),
        "inventory:\n  -\n    name: sword\n    count: 1\n  -\n    name: potion\n    count: 5"
    );
    assert_eq!(doc.get::<Vec<Item>>("inventory").unwrap(), items);
}

#[test]
fn whole_file_round_trip_through_serde() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Config {
        name: String,
        retries: u32,
        endpoints: Vec<String>,
    }

    let config = Config {
        name: "svc".to_string(),
        retries: 3,
        endpoints: vec!["a".to_string(), "b".to_string()],
    };
    let text = to_string(&config).unwrap();
    let back: Config = from_str(&text).unwrap();
    assert_eq!(config, back);
}

#[test]
fn dynamic_values_via_macro() {
    let data = succ!({
        "name": "Alice",
        "level": 7,
        "perks": ["strong", "fast"]
    });

    let mut doc = Document::new();
    if let Value::Map(map) = &data {
        for (key, value) in map.iter() {
            doc.set(key, value).unwrap();
        }
    }
    assert_eq!(
        doc.to_text(),
        "name: Alice\nlevel: 7\nperks:\n  - strong\n  - fast"
    );

    let read: Value = from_str(&doc.to_text()).unwrap();
    assert_eq!(read, data);
}

#[test]
fn remove_then_reinsert_key() {
    let mut doc = Document::parse("a: 1\nb: 2").unwrap();
    assert!(doc.remove("a"));
    doc.set("a", &3).unwrap();
    assert_eq!(doc.to_text(), "b: 2\na: 3");
}

#[test]
fn wider_indentation_style() {
    let style = FileStyle::new().with_indentation_interval(4);
    let mut doc = Document::with_style(style);
    doc.set("outer", &succ!({"inner": 1})).unwrap();
    assert_eq!(doc.to_text(), "outer:\n    inner: 1");
}

#[test]
fn rewriting_keeps_the_authored_indentation() {
    let text = "outer:\n      deep: 1";
    let mut doc = Document::parse(text).unwrap();
    doc.set("outer", &succ!({"deep": 2})).unwrap();
    assert_eq!(doc.to_text(), "outer:\n      deep: 2");
}

#[test]
fn multi_line_strings_survive_editing_neighbours() {
    let text = "title: demo\nbody: \"\"\"\n  line one\n  line two\n  \"\"\"";
    let mut doc = Document::parse(text).unwrap();
    doc.set("title", "updated").unwrap();
    assert_eq!(doc.get::<String>("body").unwrap(), "line one\nline two");
    assert_eq!(doc.to_text(), text.replace("title: demo", "title: updated"));
}

#[test]
fn comparison_with_serde_json_semantics() {
    // The same data through serde_json and through SUCC should agree once
    // both are read back into dynamic values.
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Data {
        flag: bool,
        nums: Vec<i64>,
    }

    let data = Data {
        flag: true,
        nums: vec![1, 2],
    };
    let via_json: Data = serde_json::from_str(&serde_json::to_string(&data).unwrap()).unwrap();
    let via_succ: Data = from_str(&to_string(&data).unwrap()).unwrap();
    assert_eq!(via_json, via_succ);
}
