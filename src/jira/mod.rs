//! Jira XML export input
//!
//! Jira's "Export → XML" produces an RSS document with one `<item>` per
//! issue:
//!
//! ```xml
//! <rss version="0.92">
//!   <channel>
//!     <item>
//!       <key id="10002">APP-2</key>
//!       <summary>Login page</summary>
//!       <type id="10001">Story</type>
//!       <status id="3">Task In Progress</status>
//!       <assignee username="alice">Alice</assignee>
//!       <customfields>
//!         <customfield id="customfield_10008">
//!           <customfieldname>Epic Link</customfieldname>
//!           <customfieldvalues><customfieldvalue>APP-1</customfieldvalue></customfieldvalues>
//!         </customfield>
//!       </customfields>
//!     </item>
//!   </channel>
//! </rss>
//! ```

mod item;
mod parser;

pub use item::{
    ItemKind, JiraComment, JiraCustomField, JiraExport, JiraItem, EPIC_LINK_FIELD,
    ESTIMATE_FIELD, SPRINT_FIELD,
};
