//! Round-trip tests for the YSON text writer.
//!
//! The crate ships no YSON reader, so this file carries a small decoder for
//! the subset of YSON text the writer produces.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use yson_bench_gen::scenario::{self, Scenario};
use yson_gen::yson;
use yson_gen::{GeneratorConfig, RecordGenerator, ScalarType, UnsignedDomain, Value};

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&mut self) -> Option<u8> {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) {
        assert_eq!(
            self.peek(),
            Some(byte),
            "expected '{}' at offset {}",
            byte as char,
            self.pos
        );
        self.pos += 1;
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    fn value(&mut self) -> Value {
        match self.peek().expect("unexpected end of input") {
            b'#' => {
                self.pos += 1;
                Value::Null
            }
            b'%' => {
                self.pos += 1;
                let start = self.pos;
                while self.pos < self.input.len()
                    && (self.input[self.pos].is_ascii_alphabetic() || self.input[self.pos] == b'-')
                {
                    self.pos += 1;
                }
                match &self.input[start..self.pos] {
                    b"true" => Value::Bool(true),
                    b"false" => Value::Bool(false),
                    b"nan" => Value::Float(f64::NAN),
                    b"inf" => Value::Float(f64::INFINITY),
                    b"-inf" => Value::Float(f64::NEG_INFINITY),
                    other => panic!("unknown literal %{}", String::from_utf8_lossy(other)),
                }
            }
            b'"' => Value::Str(self.string()),
            b'[' => {
                self.pos += 1;
                let mut items = Vec::new();
                while self.peek() != Some(b']') {
                    if !items.is_empty() {
                        self.expect(b';');
                    }
                    items.push(self.value());
                }
                self.pos += 1;
                Value::List(items)
            }
            b'{' => {
                self.pos += 1;
                let entries = self.entries(b'}');
                Value::Map(entries)
            }
            _ => self.number(),
        }
    }

    /// `"key" = value` entries up to `close`, consuming it
    fn entries(&mut self, close: u8) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        while self.peek() != Some(close) {
            if !entries.is_empty() {
                self.expect(b';');
            }
            let key = if self.peek() == Some(b'"') {
                self.string()
            } else {
                // Attribute names may be bare identifiers
                let start = self.pos;
                while self.pos < self.input.len()
                    && (self.input[self.pos].is_ascii_alphanumeric() || self.input[self.pos] == b'_')
                {
                    self.pos += 1;
                }
                String::from_utf8(self.input[start..self.pos].to_vec()).unwrap()
            };
            self.expect(b'=');
            entries.push((key, self.value()));
        }
        self.pos += 1;
        entries
    }

    fn string(&mut self) -> String {
        self.expect(b'"');
        let mut bytes = Vec::new();
        loop {
            let b = self.input[self.pos];
            self.pos += 1;
            match b {
                b'"' => break,
                b'\\' => {
                    let escaped = self.input[self.pos];
                    self.pos += 1;
                    match escaped {
                        b'n' => bytes.push(b'\n'),
                        b'r' => bytes.push(b'\r'),
                        b't' => bytes.push(b'\t'),
                        b'x' => {
                            let hex = std::str::from_utf8(&self.input[self.pos..self.pos + 2])
                                .unwrap();
                            bytes.push(u8::from_str_radix(hex, 16).unwrap());
                            self.pos += 2;
                        }
                        other => bytes.push(other),
                    }
                }
                other => bytes.push(other),
            }
        }
        String::from_utf8(bytes).unwrap()
    }

    fn number(&mut self) -> Value {
        let start = self.pos;
        while self.pos < self.input.len()
            && matches!(self.input[self.pos], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
        {
            self.pos += 1;
        }
        let token = std::str::from_utf8(&self.input[start..self.pos]).unwrap();
        if token.contains(['.', 'e', 'E']) {
            Value::Float(token.parse().unwrap())
        } else if let Ok(n) = token.parse::<i64>() {
            Value::Int(n)
        } else {
            Value::Uint(token.parse().unwrap())
        }
    }
}

fn decode(text: &str) -> Value {
    let mut decoder = Decoder::new(text);
    let value = decoder.value();
    assert!(decoder.at_end(), "trailing input after value");
    value
}

/// Decode a bare top-level list fragment: `a; b; c`
fn decode_fragment(text: &str) -> Vec<Value> {
    let mut decoder = Decoder::new(text);
    let mut items = Vec::new();
    while !decoder.at_end() {
        if !items.is_empty() {
            decoder.expect(b';');
        }
        items.push(decoder.value());
    }
    items
}

/// Decode `<name = value; ...>` into its entries
fn decode_attributes(text: &str) -> Vec<(String, Value)> {
    let mut decoder = Decoder::new(text);
    decoder.expect(b'<');
    let entries = decoder.entries(b'>');
    assert!(decoder.at_end());
    entries
}

/// Map a generated tree onto what the text form can express: variants and
/// dict entries are plain lists, and unsigned values that fit in i64 read
/// back as signed.
fn normalize(value: Value) -> Value {
    match value {
        Value::Uint(n) if n <= i64::MAX as u64 => Value::Int(n as i64),
        Value::List(items) => Value::List(items.into_iter().map(normalize).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .collect(),
        ),
        Value::Tagged(tag, inner) => Value::List(vec![Value::Int(tag as i64), normalize(*inner)]),
        Value::Pairs(pairs) => Value::List(
            pairs
                .into_iter()
                .map(|(k, v)| Value::List(vec![normalize(k), normalize(v)]))
                .collect(),
        ),
        other => other,
    }
}

#[test]
fn test_strings_with_structural_characters_round_trip() {
    let payloads = [
        "a,b",
        "key: value",
        "null",
        "true",
        "false",
        "%true",
        "#",
        "x; y = z",
        "[1; 2]",
        "{\"k\" = 1}",
        "quote \" and \\ backslash",
        "line\nbreak\ttab\rreturn",
        "bell\u{7}",
        "",
    ];

    let value = Value::List(payloads.iter().map(|s| Value::str(*s)).collect());
    let text = yson::to_string(&value);
    assert_eq!(decode(&text), value);
}

#[test]
fn test_scalars_round_trip() {
    let value = Value::map([
        ("null", Value::Null),
        ("yes", Value::Bool(true)),
        ("no", Value::Bool(false)),
        ("min", Value::Int(i64::MIN)),
        ("max", Value::Uint(u64::MAX)),
        ("whole", Value::Float(3.0)),
        ("tiny", Value::Float(1.5e-300)),
        ("huge", Value::Float(6.02e23)),
        ("negative", Value::Float(-0.0001)),
    ]);
    assert_eq!(decode(&yson::to_string(&value)), value);
}

#[test]
fn test_generated_complex_rows_round_trip() {
    let schema = scenario::complex_types_schema();
    let config = GeneratorConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let rows = RecordGenerator::new(&schema, &config)
        .unwrap()
        .generate(&mut rng, 200);

    let decoded = decode_fragment(&yson::rows_to_string(&rows));
    let expected: Vec<Value> = rows
        .into_iter()
        .map(|row| normalize(row.into_value()))
        .collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_full_unsigned_domain_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let schema = scenario::generate_schema(&mut rng, 40, &ScalarType::NUMERIC, true).unwrap();
    let config = GeneratorConfig::default().with_unsigned_domain(UnsignedDomain::Full);
    let rows = RecordGenerator::new(&schema, &config)
        .unwrap()
        .generate(&mut rng, 100);

    let decoded = decode_fragment(&yson::rows_to_string(&rows));
    let expected: Vec<Value> = rows
        .into_iter()
        .map(|row| normalize(row.into_value()))
        .collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_simple_two_three_rows() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let schema = Scenario::SimpleTwo.build_schema(&mut rng).unwrap();
    let config = GeneratorConfig::default();
    let rows = RecordGenerator::new(&schema, &config)
        .unwrap()
        .generate(&mut rng, 3);

    let text = yson::rows_to_string(&rows);
    assert!(text.starts_with("{\"id\" = "));
    assert!(text.ends_with('}'));
    assert_eq!(text.matches("}; {").count(), 2);

    let decoded = decode_fragment(&text);
    assert_eq!(decoded.len(), 3);
    for row in decoded {
        let Value::Map(entries) = row else {
            panic!("row is not a map");
        };
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].0, "id");
        let Value::Int(id) = entries[0].1 else {
            panic!("id is not an integer");
        };
        assert!((0..1 << 31).contains(&id));

        assert_eq!(entries[1].0, "data");
        let Value::Str(ref data) = entries[1].1 else {
            panic!("data is not a string");
        };
        assert!((1..=50).contains(&data.len()));
        assert!(data.chars().all(|c| c.is_ascii_alphabetic()));
    }
}

#[test]
fn test_dict_entries_keep_duplicate_keys() {
    let dict = Value::Pairs(vec![
        (Value::Int(1), Value::str("a")),
        (Value::Int(1), Value::str("b")),
        (Value::Int(-7), Value::str("c")),
    ]);
    let text = yson::to_string(&dict);
    assert_eq!(text, r#"[[1; "a"]; [1; "b"]; [-7; "c"]]"#);

    let Value::List(entries) = decode(&text) else {
        panic!("dict is not a list");
    };
    assert_eq!(entries.len(), 3);
    assert!(entries
        .iter()
        .all(|e| matches!(e, Value::List(pair) if pair.len() == 2)));
}

#[test]
fn test_schema_attribute_decodes() {
    let schema = scenario::complex_types_schema();
    let attributes = decode_attributes(&yson::encode_schema(&schema));

    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].0, "schema");
    assert_eq!(attributes[0].1, yson::schema_value(&schema));

    let Value::List(columns) = &attributes[0].1 else {
        panic!("schema is not a list");
    };
    assert_eq!(columns.len(), 6);
    assert_eq!(
        columns[0],
        Value::map([
            ("name", Value::str("optional")),
            (
                "type_v3",
                Value::map([
                    ("type_name", Value::str("optional")),
                    ("item", Value::str("string")),
                ])
            ),
            ("required", Value::Bool(false)),
        ])
    );
}
