//! Byte encoding of command arguments.

use super::types::{FetchAttribute, FetchItems, SearchCriteria, StoreAction};
use crate::types::UidSet;

/// Appends the wire form of a command argument.
pub(super) trait Encode {
    fn encode(&self, out: &mut Vec<u8>);
}

/// An atom when possible, else a quoted string. Text a quoted string
/// cannot carry (CR, LF, NUL, non-ASCII) goes out as a synchronizing
/// literal.
pub(super) struct AString<'a>(pub &'a str);

impl Encode for AString<'_> {
    fn encode(&self, out: &mut Vec<u8>) {
        let s = self.0;
        if !s.is_empty() && s.bytes().all(is_atom_char) {
            out.extend_from_slice(s.as_bytes());
        } else if s.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0) || !b.is_ascii()) {
            out.extend_from_slice(format!("{{{}}}\r\n", s.len()).as_bytes());
            out.extend_from_slice(s.as_bytes());
        } else {
            out.push(b'"');
            for b in s.bytes() {
                if matches!(b, b'"' | b'\\') {
                    out.push(b'\\');
                }
                out.push(b);
            }
            out.push(b'"');
        }
    }
}

const fn is_atom_char(b: u8) -> bool {
    b > 0x20
        && b < 0x7F
        && !matches!(b, b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*' | b']')
}

fn encode_separated<T: Encode>(items: &[T], out: &mut Vec<u8>) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(b' ');
        }
        item.encode(out);
    }
}

impl Encode for UidSet {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.to_string().as_bytes());
    }
}

impl Encode for FetchAttribute {
    fn encode(&self, out: &mut Vec<u8>) {
        let name: &[u8] = match self {
            Self::Flags => b"FLAGS",
            Self::Envelope => b"ENVELOPE",
            Self::Uid => b"UID",
            Self::Body { section, peek } => {
                out.extend_from_slice(if *peek { b"BODY.PEEK[" } else { b"BODY[" });
                out.extend_from_slice(section.as_deref().unwrap_or_default().as_bytes());
                b"]"
            }
        };
        out.extend_from_slice(name);
    }
}

impl Encode for FetchItems {
    fn encode(&self, out: &mut Vec<u8>) {
        if let [only] = self.attributes() {
            only.encode(out);
        } else {
            out.push(b'(');
            encode_separated(self.attributes(), out);
            out.push(b')');
        }
    }
}

impl Encode for SearchCriteria {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::All => out.extend_from_slice(b"ALL"),
            Self::Unseen => out.extend_from_slice(b"UNSEEN"),
            Self::Seen => out.extend_from_slice(b"SEEN"),
            Self::Deleted => out.extend_from_slice(b"DELETED"),
            Self::And(all) => encode_separated(all, out),
            Self::Not(inner) => {
                out.extend_from_slice(b"NOT ");
                inner.encode(out);
            }
        }
    }
}

/// Data item and flag list of a STORE, e.g. `+FLAGS.SILENT (\Seen)`.
pub(super) struct Store<'a> {
    pub action: &'a StoreAction,
    pub silent: bool,
}

impl Encode for Store<'_> {
    fn encode(&self, out: &mut Vec<u8>) {
        let (item, flags) = match self.action {
            StoreAction::SetFlags(f) => ("FLAGS", f),
            StoreAction::AddFlags(f) => ("+FLAGS", f),
            StoreAction::RemoveFlags(f) => ("-FLAGS", f),
        };
        out.extend_from_slice(item.as_bytes());
        if self.silent {
            out.extend_from_slice(b".SILENT");
        }
        out.extend_from_slice(b" (");
        for (i, flag) in flags.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.extend_from_slice(flag.as_str().as_bytes());
        }
        out.push(b')');
    }
}

/// Appends a space and then `arg`.
pub(super) fn push_arg(out: &mut Vec<u8>, arg: &dyn Encode) {
    out.push(b' ');
    arg.encode(out);
}
