//! Structured decoding of CLI output.
//!
//! Decoders turn the text of a known `show` command into a nested JSON
//! value. Only `show vtp status` has a decoder. Its shape is the same on
//! IOS and NX-OS:
//!
//! ```text
//! VTP Version capable             : 1 to 3
//! VTP version running             : 1
//! VTP Domain Name                 : CORE
//! VTP Pruning Mode                : Disabled
//! VTP Traps Generation            : Disabled
//! Configuration Revision          : 0
//! Maximum VLANs supported locally : 1005
//! Number of existing VLANs        : 12
//! VTP Operating Mode              : Transparent
//! ```
//!
//! decodes to `{"vtp": {"version_capable": "1 to 3", "version": "1", ...,
//! "operating_mode": "transparent"}}`.
//!
//! VTPv3 prints the per-database fields once per `Feature VLAN:`,
//! `Feature MST:` and `Feature UNKNOWN:` section. Those land under
//! `vtp.feature.<name>`, and the top-level fields are taken from the VLAN
//! section, or from the first section that has them when there is none.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// `key : value` line. Keys never contain a colon.
static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^:]+?)\s*:[ \t]*(.*?)\s*$").unwrap());

/// VTPv3 section header, e.g. `Feature VLAN:`.
static FEATURE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Feature\s+(\S+)\s*:\s*$").unwrap());

#[derive(Clone, Copy)]
enum FieldKind {
    Text,
    Lowercase,
    Integer,
}

/// Known `show vtp status` labels and the keys they decode to.
const VTP_STATUS_FIELDS: &[(&str, &str, FieldKind)] = &[
    ("VTP Version", "version", FieldKind::Text),
    ("VTP version running", "version", FieldKind::Text),
    ("VTP Version capable", "version_capable", FieldKind::Text),
    ("VTP Domain Name", "domain_name", FieldKind::Text),
    ("VTP Pruning Mode", "pruning_mode", FieldKind::Lowercase),
    ("VTP Traps Generation", "traps_generation", FieldKind::Lowercase),
    ("VTP V2 Mode", "v2_mode", FieldKind::Lowercase),
    ("Device ID", "device_id", FieldKind::Text),
    ("Configuration Revision", "configuration_revision", FieldKind::Integer),
    ("Maximum VLANs supported locally", "maximum_vlans", FieldKind::Integer),
    ("Number of existing VLANs", "number_of_existing_vlans", FieldKind::Integer),
    ("VTP Operating Mode", "operating_mode", FieldKind::Lowercase),
    ("MD5 digest", "md5_digest", FieldKind::Text),
];

/// Decode the output of `command`, if a decoder exists for it.
pub fn decode(command: &str, text: &str) -> Option<Value> {
    let normalized = command.split_whitespace().collect::<Vec<_>>().join(" ");
    match normalized.as_str() {
        "show vtp status" => Some(decode_vtp_status(text)),
        _ => None,
    }
}

/// Decode `show vtp status` output into `{"vtp": {...}}`.
///
/// Unrecognized lines are ignored, and so are empty or `-` values. Output
/// that contains no known field decodes to `{"vtp": {}}`.
pub fn decode_vtp_status(text: &str) -> Value {
    let mut vtp = Map::new();
    let mut features: Map<String, Value> = Map::new();
    let mut section: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = FEATURE_HEADER.captures(line) {
            section = Some(caps[1].to_ascii_lowercase());
            continue;
        }

        let Some(caps) = FIELD_LINE.captures(line) else {
            continue;
        };
        let label = &caps[1];
        let raw = &caps[2];
        if raw.is_empty() || raw == "-" {
            continue;
        }

        let Some((_, key, kind)) = VTP_STATUS_FIELDS
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(label))
        else {
            continue;
        };

        let value = match kind {
            FieldKind::Text => Value::String(raw.to_string()),
            FieldKind::Lowercase => Value::String(raw.to_ascii_lowercase()),
            FieldKind::Integer => raw
                .parse::<u64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
        };

        match section.as_deref() {
            Some(name) => {
                if let Value::Object(fields) = features
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()))
                {
                    fields.entry(*key).or_insert_with(|| value.clone());
                }
                if name == "vlan" {
                    vtp.insert((*key).to_string(), value);
                } else {
                    vtp.entry(*key).or_insert(value);
                }
            }
            None => {
                vtp.entry(*key).or_insert(value);
            }
        }
    }

    if !features.is_empty() {
        vtp.insert("feature".to_string(), Value::Object(features));
    }

    let mut root = Map::new();
    root.insert("vtp".to_string(), Value::Object(vtp));
    Value::Object(root)
}
