//! Display collection repository contracts and XML implementation.
//!
//! # Responsibility
//! - Read and write collection snapshots in the `DisplayItems` document
//!   format.
//! - Keep XML details inside the persistence boundary.
//!
//! # Invariants
//! - Written levels always match the node position (top level or nested).
//! - Read snapshots take their structure from the nesting. A `Level` that
//!   disagrees with the position is reported and overridden.
//! - Names round-trip exactly. Carriage returns are written as character
//!   references; characters XML 1.0 cannot carry are rejected on write.
//! - Read UIDs are kept when they parse and are unique in the document;
//!   otherwise a fresh one is minted.
//!
//! # Document shape
//! ```xml
//! <DisplayItems>
//!   <DisplayItem>
//!     <Name>Group 1</Name>
//!     <UID>...</UID>
//!     <Level>Parent</Level>
//!     <Items>
//!       <DisplayItem>...</DisplayItem>
//!     </Items>
//!   </DisplayItem>
//! </DisplayItems>
//! ```

use crate::model::entity::EntitySnapshot;
use crate::model::level::{level_of, EntityKind, Level};
use log::{info, warn};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ROOT_TAG: &str = "DisplayItems";
const ITEM_TAG: &str = "DisplayItem";
const NAME_TAG: &str = "Name";
const UID_TAG: &str = "UID";
const LEVEL_TAG: &str = "Level";
const CHILDREN_TAG: &str = "Items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from collection persistence.
#[derive(Debug)]
pub enum RepoError {
    /// File could not be read or written.
    Io(std::io::Error),
    /// Document is not well-formed XML, or the writer failed.
    Xml(String),
    /// A `DisplayItem` lacks a required child element.
    MissingElement(&'static str),
    /// `Level` text is not one of the four level names.
    InvalidLevel(String),
    /// Root element is not `DisplayItems`.
    UnexpectedRoot(String),
    /// Text holds a character XML 1.0 cannot represent.
    UnrepresentableCharacter { tag: &'static str, character: char },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Xml(message) => write!(f, "invalid display items document: {message}"),
            Self::MissingElement(tag) => write!(f, "display item is missing `<{tag}>`"),
            Self::InvalidLevel(value) => write!(f, "unsupported display item level `{value}`"),
            Self::UnexpectedRoot(tag) => {
                write!(f, "expected root `<{ROOT_TAG}>`, found `<{tag}>`")
            }
            Self::UnrepresentableCharacter { tag, character } => write!(
                f,
                "`<{tag}>` text holds {character:?}, which XML 1.0 cannot represent"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<quick_xml::Error> for RepoError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value.to_string())
    }
}

impl From<roxmltree::Error> for RepoError {
    fn from(value: roxmltree::Error) -> Self {
        Self::Xml(value.to_string())
    }
}

/// Repository interface for whole-collection persistence.
pub trait DisplayRepository {
    fn read(&self) -> RepoResult<Vec<EntitySnapshot>>;
    fn write(&self, snapshots: &[EntitySnapshot]) -> RepoResult<()>;
}

/// XML file-backed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlFileRepository {
    path: PathBuf,
}

impl XmlFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DisplayRepository for XmlFileRepository {
    fn read(&self) -> RepoResult<Vec<EntitySnapshot>> {
        let xml = std::fs::read_to_string(&self.path)?;
        let snapshots = from_xml_str(&xml)?;
        info!(
            "event=repo_read module=repo status=ok top_level={} path={}",
            snapshots.len(),
            self.path.display()
        );
        Ok(snapshots)
    }

    fn write(&self, snapshots: &[EntitySnapshot]) -> RepoResult<()> {
        let xml = to_xml_string(snapshots)?;
        std::fs::write(&self.path, xml)?;
        info!(
            "event=repo_write module=repo status=ok top_level={} path={}",
            snapshots.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Serializes a collection snapshot as an indented `DisplayItems` document.
pub fn to_xml_string(snapshots: &[EntitySnapshot]) -> RepoResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;
    for snapshot in snapshots {
        write_item(&mut writer, snapshot, false)?;
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;

    String::from_utf8(writer.into_inner()).map_err(|err| RepoError::Xml(err.to_string()))
}

/// Parses a `DisplayItems` document into top-level snapshots.
pub fn from_xml_str(xml: &str) -> RepoResult<Vec<EntitySnapshot>> {
    let document = roxmltree::Document::parse(xml)?;
    let root = document.root_element();
    if root.tag_name().name() != ROOT_TAG {
        return Err(RepoError::UnexpectedRoot(root.tag_name().name().to_string()));
    }

    let mut seen = HashSet::new();
    read_items(root, false, &mut seen)
}

fn write_item(
    writer: &mut Writer<Vec<u8>>,
    snapshot: &EntitySnapshot,
    nested: bool,
) -> RepoResult<()> {
    let kind = snapshot.level.kind();
    let level = level_of(kind, nested);

    writer.write_event(Event::Start(BytesStart::new(ITEM_TAG)))?;
    write_text_element(writer, NAME_TAG, &snapshot.name)?;
    write_text_element(writer, UID_TAG, &snapshot.uid.to_string())?;
    write_text_element(writer, LEVEL_TAG, level.as_str())?;
    if kind == EntityKind::Group {
        writer.write_event(Event::Start(BytesStart::new(CHILDREN_TAG)))?;
        for child in &snapshot.children {
            write_item(writer, child, true)?;
        }
        writer.write_event(Event::End(BytesEnd::new(CHILDREN_TAG)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(ITEM_TAG)))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &'static str,
    text: &str,
) -> RepoResult<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }
    if let Some(character) = text.chars().find(|c| !is_xml_char(*c)) {
        return Err(RepoError::UnrepresentableCharacter { tag, character });
    }
    // Raw `\r` would come back as `\n` after end-of-line normalization.
    let escaped = escape(text).replace('\r', "&#13;");
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn read_items(
    container: roxmltree::Node<'_, '_>,
    nested: bool,
    seen: &mut HashSet<Uuid>,
) -> RepoResult<Vec<EntitySnapshot>> {
    container
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == ITEM_TAG)
        .map(|node| read_item(node, nested, seen))
        .collect()
}

fn read_item(
    node: roxmltree::Node<'_, '_>,
    nested: bool,
    seen: &mut HashSet<Uuid>,
) -> RepoResult<EntitySnapshot> {
    let name = child_element(node, NAME_TAG)
        .ok_or(RepoError::MissingElement(NAME_TAG))?
        .text()
        .unwrap_or_default()
        .to_string();
    let level_text = child_element(node, LEVEL_TAG)
        .ok_or(RepoError::MissingElement(LEVEL_TAG))?
        .text()
        .unwrap_or_default();
    let written_level =
        Level::parse(level_text).ok_or_else(|| RepoError::InvalidLevel(level_text.to_string()))?;
    let kind = written_level.kind();
    let level = level_of(kind, nested);
    if level != written_level {
        warn!(
            "event=repo_read module=repo status=warn reason=level_mismatch written={} actual={}",
            written_level, level
        );
    }

    let uid = read_uid(node, seen);
    let children = match (kind, child_element(node, CHILDREN_TAG)) {
        (EntityKind::Group, Some(items)) => read_items(items, true, seen)?,
        (EntityKind::Item, Some(_)) => {
            warn!("event=repo_read module=repo status=warn reason=item_with_children uid={uid}");
            Vec::new()
        }
        (_, None) => Vec::new(),
    };

    Ok(EntitySnapshot {
        uid,
        name,
        level,
        children,
    })
}

fn read_uid(node: roxmltree::Node<'_, '_>, seen: &mut HashSet<Uuid>) -> Uuid {
    let parsed = child_element(node, UID_TAG)
        .and_then(|uid| uid.text())
        .and_then(|text| Uuid::parse_str(text.trim()).ok())
        .filter(|uid| !uid.is_nil());
    match parsed {
        Some(uid) if seen.insert(uid) => uid,
        _ => {
            let fresh = Uuid::new_v4();
            seen.insert(fresh);
            fresh
        }
    }
}

fn child_element<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    tag: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

#[cfg(test)]
mod tests {
    use super::{from_xml_str, is_xml_char, to_xml_string, RepoError};
    use crate::model::entity::EntitySnapshot;
    use crate::model::level::Level;

    #[test]
    fn written_document_uses_wire_tags() {
        let xml = to_xml_string(&[EntitySnapshot::group(
            "Group 1",
            vec![EntitySnapshot::item("a & b")],
        )])
        .unwrap();

        assert!(xml.contains("<DisplayItems>"));
        assert!(xml.contains("<Level>Parent</Level>"));
        assert!(xml.contains("<Level>Child</Level>"));
        assert!(xml.contains("<Name>a &amp; b</Name>"));
        assert!(xml.contains("<Items>"));
    }

    #[test]
    fn carriage_returns_are_written_as_references() {
        let xml = to_xml_string(&[EntitySnapshot::item("a\r\nb")]).unwrap();

        assert!(xml.contains("<Name>a&#13;\nb</Name>"));
        assert!(is_xml_char('\u{10FFFF}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert!(!is_xml_char('\u{0}'));
    }

    #[test]
    fn position_overrides_written_level() {
        let xml = r#"<DisplayItems>
            <DisplayItem>
                <Name>stray</Name>
                <UID>not-a-uid</UID>
                <Level>Child</Level>
            </DisplayItem>
        </DisplayItems>"#;

        let snapshots = from_xml_str(xml).unwrap();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].level, Level::Ungrouped);
        assert!(!snapshots[0].uid.is_nil());
    }

    #[test]
    fn unknown_root_and_level_are_rejected() {
        assert!(matches!(
            from_xml_str("<Other/>").unwrap_err(),
            RepoError::UnexpectedRoot(tag) if tag == "Other"
        ));
        let bad_level = r#"<DisplayItems><DisplayItem><Name/><Level>Grand</Level></DisplayItem></DisplayItems>"#;
        assert!(matches!(
            from_xml_str(bad_level).unwrap_err(),
            RepoError::InvalidLevel(value) if value == "Grand"
        ));
    }
}
