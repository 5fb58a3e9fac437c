//! XML parser for Jira RSS exports
//!
//! Reads `rss > channel > item` with an event reader. Only the item children
//! the migration needs are kept; everything else is skipped.

use super::item::{JiraComment, JiraCustomField, JiraExport, JiraItem};
use crate::{MigrationError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// Username Jira writes for unassigned issues
const UNASSIGNED: &str = "-1";

impl JiraExport {
    /// Parse an export from XML content
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut state = ParseState::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => state.start(e)?,
                Ok(Event::Empty(ref e)) => state.empty(e)?,
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    state.end(&name);
                }
                Ok(Event::Text(ref e)) => {
                    if state.in_item() {
                        let raw: &[u8] = e;
                        state.text.push_str(&unescape_lossy(&String::from_utf8_lossy(raw)));
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if state.in_item() {
                        let raw: &[u8] = e;
                        state.text.push_str(&String::from_utf8_lossy(raw));
                    }
                }
                Ok(Event::GeneralRef(ref e)) => {
                    if state.in_item() {
                        let raw: &[u8] = e;
                        let reference = format!("&{};", String::from_utf8_lossy(raw));
                        state.text.push_str(&unescape_lossy(&reference));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(MigrationError::Parse(format!(
                        "Error parsing Jira XML at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        if let Some(open) = state.path.last() {
            return Err(MigrationError::Parse(format!(
                "Unexpected end of document inside <{}>",
                open
            )));
        }
        if !state.saw_root {
            return Err(MigrationError::Parse(
                "Not a Jira XML export: missing <rss> root element".to_string(),
            ));
        }

        tracing::debug!(items = state.export.items.len(), "Parsed Jira export");
        Ok(state.export)
    }

    /// Parse an export from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let export = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            items = export.items.len(),
            "Loaded Jira export"
        );
        Ok(export)
    }
}

#[derive(Default)]
struct ParseState {
    export: JiraExport,
    /// Names of the currently open elements, root first
    path: Vec<String>,
    item: Option<JiraItem>,
    comment: Option<JiraComment>,
    field: Option<JiraCustomField>,
    text: String,
    saw_root: bool,
}

impl ParseState {
    fn in_item(&self) -> bool {
        self.item.is_some()
    }

    fn start(&mut self, e: &BytesStart) -> Result<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if self.path.is_empty() {
            if name != "rss" {
                return Err(MigrationError::Parse(format!(
                    "Not a Jira XML export: root element is <{}>",
                    name
                )));
            }
            self.saw_root = true;
        }

        self.text.clear();

        let parent = self.path.last().cloned();
        match (parent.as_deref(), name.as_str()) {
            (Some("channel"), "item") => self.item = Some(JiraItem::default()),
            (Some("comments"), "comment") if self.in_item() => {
                self.comment = Some(parse_comment(e)?);
            }
            (Some("customfields"), "customfield") if self.in_item() => {
                self.field = Some(JiraCustomField::default());
            }
            (Some("item"), "assignee" | "reporter") => self.set_user(&name, e)?,
            _ => {}
        }

        self.path.push(name);
        Ok(())
    }

    /// Self-closing tags like `<assignee username="x"/>` or `<comment .../>`
    fn empty(&mut self, e: &BytesStart) -> Result<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if self.path.is_empty() {
            if name != "rss" {
                return Err(MigrationError::Parse(format!(
                    "Not a Jira XML export: root element is <{}/>",
                    name
                )));
            }
            self.saw_root = true;
            return Ok(());
        }

        let parent = self.path.last().cloned();
        match (parent.as_deref(), name.as_str()) {
            (Some("item"), "assignee" | "reporter") => self.set_user(&name, e)?,
            (Some("comments"), "comment") => {
                let comment = parse_comment(e)?;
                if let Some(ref mut item) = self.item {
                    item.comments.push(comment);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &str) {
        self.path.pop();
        let text = std::mem::take(&mut self.text);

        let parent = self.path.last().map(String::as_str);

        if parent == Some("channel") && name == "item" {
            if let Some(item) = self.item.take() {
                tracing::trace!(key = %item.key, "Parsed item");
                self.export.items.push(item);
            }
            return;
        }

        let Some(ref mut item) = self.item else {
            return;
        };

        match (parent, name) {
            (Some("item"), "key") => item.key = text.trim().to_string(),
            (Some("item"), "type") => item.item_type = text.trim().to_string(),
            (Some("item"), "title") => item.title = text.trim().to_string(),
            (Some("item"), "project") => item.project = text.trim().to_string(),
            (Some("item"), "summary") => item.summary = text,
            (Some("item"), "description") => item.description = text,
            (Some("item"), "status") => item.status = text.trim().to_string(),
            (Some("item"), "parent") => item.parent = text.trim().to_string(),
            (Some("item"), "created") => item.created = text.trim().to_string(),
            (Some("item"), "updated") => item.updated = text.trim().to_string(),
            (Some("item"), "resolved") => item.resolved = text.trim().to_string(),
            (Some("labels"), "label") => {
                let label = text.trim();
                if !label.is_empty() {
                    item.labels.push(label.to_string());
                }
            }
            (Some("comments"), "comment") => {
                if let Some(mut comment) = self.comment.take() {
                    comment.body = text;
                    item.comments.push(comment);
                }
            }
            (Some("customfield"), "customfieldname") => {
                if let Some(ref mut field) = self.field {
                    field.name = text.trim().to_string();
                }
            }
            (Some("customfieldvalues"), "customfieldvalue") => {
                if let Some(ref mut field) = self.field {
                    field.values.push(text.trim().to_string());
                }
            }
            (Some("customfields"), "customfield") => {
                if let Some(field) = self.field.take() {
                    item.custom_fields.push(field);
                }
            }
            _ => {}
        }
    }

    fn set_user(&mut self, role: &str, e: &BytesStart) -> Result<()> {
        // Cloud exports carry an account id instead of a username
        let username = match get_attr(e, b"username")? {
            Some(name) => Some(name),
            None => get_attr(e, b"accountid")?,
        }
        .filter(|name| name != UNASSIGNED)
        .unwrap_or_default();

        if let Some(ref mut item) = self.item {
            match role {
                "assignee" => item.assignee = username,
                _ => item.reporter = username,
            }
        }
        Ok(())
    }
}

/// Decode XML entities, keeping the raw text if it holds an unknown one
fn unescape_lossy(raw: &str) -> String {
    match quick_xml::escape::unescape(raw) {
        Ok(text) => text.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| MigrationError::Parse(format!("Invalid attribute: {}", e)))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| MigrationError::Parse(format!("Invalid attribute value: {}", e)))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn parse_comment(e: &BytesStart) -> Result<JiraComment> {
    Ok(JiraComment {
        id: get_attr(e, b"id")?.unwrap_or_default(),
        author: get_attr(e, b"author")?.unwrap_or_default(),
        created: get_attr(e, b"created")?.unwrap_or_default(),
        body: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::ItemKind;

    const EXAMPLE_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="0.92">
    <channel>
        <title>Example Jira</title>
        <link>https://jira.example.com</link>
        <description>An XML representation of a search request</description>
        <item>
            <title>[APP-1] Launch</title>
            <project id="10000" key="APP">Application</project>
            <description>&lt;p&gt;Ship &amp;amp; celebrate&lt;/p&gt;</description>
            <key id="10001">APP-1</key>
            <summary>Launch</summary>
            <type id="10000">Epic</type>
            <status id="1">Done</status>
            <assignee username="alice">Alice</assignee>
            <reporter username="bob">Bob</reporter>
            <created>Mon, 2 Jan 2006 15:04:05 -0700</created>
            <updated>Tue, 3 Jan 2006 10:00:00 -0700</updated>
        </item>
        <item>
            <title>[APP-2] Login page</title>
            <key id="10002">APP-2</key>
            <summary>Login page</summary>
            <type id="10001">Story</type>
            <status id="3">Task In Progress</status>
            <assignee username="-1">Unassigned</assignee>
            <reporter username="bob">Bob</reporter>
            <labels>
                <label>Frontend</label>
                <label>UX</label>
            </labels>
            <created>Wed, 4 Jan 2006 09:00:00 +0000</created>
            <resolved>Fri, 6 Jan 2006 09:00:00 +0000</resolved>
            <comments>
                <comment id="1" author="alice" created="Thu, 5 Jan 2006 09:00:00 +0000">&lt;b&gt;Looks&lt;/b&gt; good</comment>
                <comment id="2" author="carol" created="Thu, 5 Jan 2006 10:00:00 +0000"/>
            </comments>
            <customfields>
                <customfield id="customfield_10008" key="com.pyxis.greenhopper.jira:gh-epic-link">
                    <customfieldname>Epic Link</customfieldname>
                    <customfieldvalues>
                        <customfieldvalue>APP-1</customfieldvalue>
                    </customfieldvalues>
                </customfield>
                <customfield id="customfield_10016" key="com.atlassian.jira.plugin.system.customfieldtypes:float">
                    <customfieldname>Story point estimate</customfieldname>
                    <customfieldvalues>
                        <customfieldvalue><![CDATA[3.0]]></customfieldvalue>
                    </customfieldvalues>
                </customfield>
            </customfields>
        </item>
        <item>
            <key id="10003">APP-3</key>
            <summary>Validate password</summary>
            <type id="10002">Sub-task</type>
            <parent id="10002">APP-2</parent>
            <assignee accountid="5b10ac8d82e05b22cc7d4ef5">Dana</assignee>
            <reporter username="bob"/>
        </item>
    </channel>
</rss>
"#;

    #[test]
    fn test_parse_export() {
        let export = JiraExport::parse(EXAMPLE_EXPORT).unwrap();
        assert_eq!(export.items.len(), 3);

        let epic = &export.items[0];
        assert_eq!(epic.key, "APP-1");
        assert_eq!(epic.kind(), ItemKind::Epic);
        assert_eq!(epic.title, "[APP-1] Launch");
        assert_eq!(epic.project, "Application");
        assert_eq!(epic.description, "<p>Ship &amp; celebrate</p>");
        assert_eq!(epic.assignee, "alice");
        assert_eq!(epic.reporter, "bob");
        assert_eq!(epic.created, "Mon, 2 Jan 2006 15:04:05 -0700");
        assert_eq!(epic.resolved, "");
    }

    #[test]
    fn test_parse_story_children() {
        let export = JiraExport::parse(EXAMPLE_EXPORT).unwrap();
        let story = &export.items[1];

        assert_eq!(story.status, "Task In Progress");
        assert_eq!(story.assignee, "");
        assert_eq!(story.labels, vec!["Frontend", "UX"]);
        assert_eq!(story.epic_link(), Some("APP-1"));
        assert_eq!(story.estimate(), 3);

        assert_eq!(story.comments.len(), 2);
        assert_eq!(story.comments[0].author, "alice");
        assert_eq!(story.comments[0].body, "<b>Looks</b> good");
        assert_eq!(story.comments[0].created, "Thu, 5 Jan 2006 09:00:00 +0000");
        assert_eq!(story.comments[1].author, "carol");
        assert_eq!(story.comments[1].body, "");
    }

    #[test]
    fn test_parse_subtask() {
        let export = JiraExport::parse(EXAMPLE_EXPORT).unwrap();
        let sub = &export.items[2];

        assert_eq!(sub.kind(), ItemKind::SubTask);
        assert_eq!(sub.parent, "APP-2");
        assert_eq!(sub.assignee, "5b10ac8d82e05b22cc7d4ef5");
        assert_eq!(sub.reporter, "bob");
    }

    #[test]
    fn test_channel_elements_ignored() {
        let export = JiraExport::parse(EXAMPLE_EXPORT).unwrap();
        assert!(export.items.iter().all(|i| i.summary != "Example Jira"));
    }

    #[test]
    fn test_empty_channel() {
        let export = JiraExport::parse("<rss><channel></channel></rss>").unwrap();
        assert!(export.items.is_empty());
    }

    #[test]
    fn test_wrong_root() {
        let result = JiraExport::parse("<manifest><project/></manifest>");
        assert!(matches!(result, Err(MigrationError::Parse(_))));
    }

    #[test]
    fn test_truncated_document() {
        let result = JiraExport::parse("<rss><channel><item><key>A-1</key>");
        assert!(matches!(result, Err(MigrationError::Parse(_))));
    }

    #[test]
    fn test_mismatched_tags() {
        let result = JiraExport::parse("<rss><channel><item></channel></rss>");
        assert!(matches!(result, Err(MigrationError::Parse(_))));
    }
}
