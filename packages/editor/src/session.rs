//! # Edit Session
//!
//! One editor instance over one page. The session holds two representations
//! of the active language, the element model (visual mode) and the code buffer
//! (code mode), and converts between them only on explicit mode transitions.
//! Every confirmed edit is committed to the language's document and handed to
//! the [`SaveClient`] when one is attached.

use crate::config::EditorConfig;
use crate::cursor::{insert_newline, line_numbers, CursorTracker, Selection};
use crate::errors::{EditorError, EditorResult};
use crate::highlight::{highlight_with_selection, rendered_buffer};
use crate::localization::LocalizedDocuments;
use crate::palette::PaletteItem;
use crate::persistence::{SaveClient, SaveStatus};
use crate::quick_edit::QuickEditPanel;
use crate::render::{render_canvas, CanvasRender};
use lander_common::{Language, Website, WebsiteId};
use lander_parser::{parse, serialize_with_options, try_parse, Element, ElementId, SerializeOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Visual,
    Code,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Visual => f.write_str("visual"),
            Mode::Code => f.write_str("code"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub serialize: SerializeOptions,
}

impl From<&EditorConfig> for SessionOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            serialize: config.serialize_options(),
        }
    }
}

/// Editing state of one page
pub struct EditorSession {
    website_id: WebsiteId,
    title: String,
    documents: LocalizedDocuments,
    language: Language,
    mode: Mode,

    /// Element model of the active language
    elements: Vec<Element>,
    /// HTML derived from `elements`
    html: String,

    code: String,
    selection: Selection,
    tracker: CursorTracker,
    highlighted: String,
    /// The buffer was typed into since code mode was entered
    code_edited: bool,

    /// Edits were committed for the active language since it was loaded
    dirty: bool,

    canvas: Option<CanvasRender>,
    quick_edit: Option<QuickEditPanel>,
    options: SessionOptions,
    save: Option<SaveClient>,
}

impl EditorSession {
    /// Open a page in visual mode on `language`, creating an empty document
    /// for it if the page has none
    pub fn open(website: &Website, language: Language, options: SessionOptions) -> Self {
        let mut session = Self {
            website_id: website.id,
            title: website.title.clone(),
            documents: LocalizedDocuments::from_website(website),
            language,
            mode: Mode::Visual,
            elements: Vec::new(),
            html: String::new(),
            code: String::new(),
            selection: Selection::default(),
            tracker: CursorTracker::new(),
            highlighted: String::new(),
            code_edited: false,
            dirty: false,
            canvas: None,
            quick_edit: None,
            options,
            save: None,
        };
        session.load_language(language);
        session
    }

    /// Attach the save client that receives committed edits
    pub fn with_save_client(mut self, save: SaveClient) -> Self {
        self.save = Some(save);
        self
    }

    pub fn website_id(&self) -> WebsiteId {
        self.website_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn documents(&self) -> &LocalizedDocuments {
        &self.documents
    }

    pub fn quick_edit(&self) -> Option<&QuickEditPanel> {
        self.quick_edit.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save_client(&self) -> Option<&SaveClient> {
        self.save.as_ref()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save.as_ref().map(SaveClient::status).unwrap_or_default()
    }

    /// Highlighted code buffer with selection and caret markup
    pub fn highlighted_code(&self) -> &str {
        &self.highlighted
    }

    /// Line labels for the active representation
    pub fn line_numbers(&self) -> Vec<String> {
        match self.mode {
            Mode::Visual => line_numbers(&self.html),
            Mode::Code => line_numbers(&self.code),
        }
    }

    /// Render the canvas, refreshing the node map used by [`click_rendered`]
    ///
    /// [`click_rendered`]: EditorSession::click_rendered
    pub fn render(&mut self) -> &CanvasRender {
        let render = render_canvas(&mut self.elements, &self.options.serialize);
        &*self.canvas.insert(render)
    }

    pub fn switch_mode(&mut self) {
        match self.mode {
            Mode::Visual => self.enter_code_mode(),
            Mode::Code => self.enter_visual_mode(),
        }
    }

    /// Visual → code: the buffer becomes the serialized model with the caret
    /// at its end
    pub fn enter_code_mode(&mut self) {
        if self.mode == Mode::Code {
            return;
        }

        self.html = self.serialize(&self.elements);
        self.code = self.html.clone();
        self.code_edited = false;
        self.quick_edit = None;
        self.mode = Mode::Code;
        self.rerender_code(Selection::caret(self.code.chars().count()));

        self.recommit_if_changed();
        tracing::debug!(website_id = self.website_id, language = %self.language, "entered code mode");
    }

    /// Code → visual: the buffer is parsed into a new model. Input that
    /// yields no elements keeps the previous model.
    pub fn enter_visual_mode(&mut self) {
        if self.mode == Mode::Visual {
            return;
        }

        if self.code_edited {
            match try_parse(&self.code) {
                Ok(elements) => {
                    let previous = std::mem::replace(&mut self.elements, elements);
                    carry_over_ids(&previous, &mut self.elements);
                }
                Err(error) => {
                    tracing::warn!(website_id = self.website_id, %error, "code did not parse, keeping previous model");
                }
            }
        }

        self.html = self.serialize(&self.elements);
        self.mode = Mode::Visual;
        self.canvas = None;

        self.recommit_if_changed();
        tracing::debug!(website_id = self.website_id, language = %self.language, "entered visual mode");
    }

    /// Append a palette element at the end of the page
    pub fn drop_palette_item(&mut self, item: PaletteItem) -> EditorResult<ElementId> {
        self.require_mode(Mode::Visual)?;

        let mut element = item.create_element();
        let id = element.ensure_id().clone();
        self.elements.push(element);
        self.model_changed();
        Ok(id)
    }

    /// Replace the code buffer as typed. The selection is carried across the
    /// re-highlight; the model is not re-parsed until visual mode is entered.
    pub fn code_input(&mut self, text: impl Into<String>, selection: Selection) -> EditorResult<()> {
        self.require_mode(Mode::Code)?;

        self.code = text.into();
        self.rerender_code(selection);
        self.code_changed();
        Ok(())
    }

    /// Enter key in the code surface: exactly one newline replaces the
    /// selection and the caret lands after it
    pub fn code_key_enter(&mut self) -> EditorResult<()> {
        self.require_mode(Mode::Code)?;

        let (buffer, caret) = insert_newline(&self.code, self.selection);
        self.code = buffer.text();
        self.tracker.capture(caret);
        self.selection = self.tracker.restore(&buffer);
        self.highlighted = highlight_with_selection(&self.code, self.selection);
        self.code_changed();
        Ok(())
    }

    /// Move the caret or selection without editing
    pub fn select_range(&mut self, start: usize, end: usize) {
        let len = match self.mode {
            Mode::Visual => self.html.chars().count(),
            Mode::Code => self.code.chars().count(),
        };
        self.selection = Selection::new(start, end).clamp(len);
        if self.mode == Mode::Code {
            self.highlighted = highlight_with_selection(&self.code, self.selection);
        }
    }

    /// Open the quick-edit panel for the element rendered as `node_id`
    pub fn click_rendered(&mut self, node_id: &str) -> EditorResult<&QuickEditPanel> {
        self.require_mode(Mode::Visual)?;

        let element_id = self
            .canvas
            .as_ref()
            .and_then(|canvas| canvas.resolve(node_id))
            .cloned()
            .ok_or_else(|| EditorError::UnknownNode(node_id.to_string()))?;
        let element = find_element(&mut self.elements, &element_id)?;

        Ok(&*self.quick_edit.insert(QuickEditPanel::open(element)))
    }

    pub fn quick_edit_set_text(&mut self, text: &str) -> EditorResult<()> {
        let panel = self.quick_edit.as_mut().ok_or(EditorError::QuickEditClosed)?;
        let element = find_element(&mut self.elements, &panel.element_id)?;
        panel.set_text(element, text);
        self.model_changed();
        Ok(())
    }

    pub fn quick_edit_set_attribute(&mut self, name: &str, value: &str) -> EditorResult<()> {
        let panel = self.quick_edit.as_mut().ok_or(EditorError::QuickEditClosed)?;
        let element = find_element(&mut self.elements, &panel.element_id)?;
        panel.set_attribute(element, name, value);
        self.model_changed();
        Ok(())
    }

    pub fn quick_edit_remove_attribute(&mut self, name: &str) -> EditorResult<bool> {
        let panel = self.quick_edit.as_mut().ok_or(EditorError::QuickEditClosed)?;
        let element = find_element(&mut self.elements, &panel.element_id)?;
        let removed = panel.remove_attribute(element, name);
        if removed {
            self.model_changed();
        }
        Ok(removed)
    }

    pub fn close_quick_edit(&mut self) {
        self.quick_edit = None;
    }

    /// Rename the page. Goes through the title write path only.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if let Some(save) = &self.save {
            save.schedule_title(self.title.clone());
        }
    }

    /// Switch the edited language. The active representation is committed
    /// verbatim and pending writes are flushed before the new language loads
    /// in visual mode.
    pub fn select_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }

        if self.dirty {
            let committed = match self.mode {
                Mode::Visual => self.html.clone(),
                Mode::Code => self.code.clone(),
            };
            self.documents.set_content(self.language, committed);
        }
        if let Some(save) = &self.save {
            save.flush_pending();
        }

        tracing::debug!(website_id = self.website_id, from = %self.language, to = %language, "switching language");
        self.load_language(language);
    }

    fn load_language(&mut self, language: Language) {
        let content = self.documents.select(language).to_string();
        self.language = language;
        self.mode = Mode::Visual;
        self.elements = parse(&content);
        self.html = self.serialize(&self.elements);
        self.code = self.html.clone();
        self.selection = Selection::default();
        self.tracker = CursorTracker::new();
        self.highlighted = String::new();
        self.code_edited = false;
        self.dirty = false;
        self.canvas = None;
        self.quick_edit = None;
    }

    fn require_mode(&self, expected: Mode) -> EditorResult<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(EditorError::WrongMode {
                expected,
                actual: self.mode,
            })
        }
    }

    fn serialize(&self, elements: &[Element]) -> String {
        serialize_with_options(elements, &self.options.serialize)
    }

    /// Re-highlight the buffer, carrying `selection` across the new segments
    fn rerender_code(&mut self, selection: Selection) {
        self.tracker.capture(selection);
        let buffer = rendered_buffer(&self.code);
        self.selection = self.tracker.restore(&buffer);
        self.highlighted = highlight_with_selection(&self.code, self.selection);
    }

    fn model_changed(&mut self) {
        self.html = self.serialize(&self.elements);
        self.canvas = None;
        self.commit(self.html.clone());
    }

    fn code_changed(&mut self) {
        self.code_edited = true;
        self.commit(self.code.clone());
    }

    fn commit(&mut self, content: String) {
        self.dirty = true;
        self.documents.set_content(self.language, content.clone());
        if let Some(save) = &self.save {
            save.schedule_content(self.language, content);
        }
    }

    /// Replace a pending write of the abandoned representation with the
    /// current html. No-op when that html is already what was committed.
    fn recommit_if_changed(&mut self) {
        if !self.dirty || self.documents.content(self.language) == Some(self.html.as_str()) {
            return;
        }
        if let Some(save) = &self.save {
            save.cancel_content();
        }
        self.commit(self.html.clone());
    }
}

fn find_element<'a>(elements: &'a mut [Element], id: &ElementId) -> EditorResult<&'a mut Element> {
    elements
        .iter_mut()
        .find(|element| element.id.as_ref() == Some(id))
        .ok_or_else(|| EditorError::UnknownElement(id.clone()))
}

/// Keep element ids for elements whose position and tag survived a re-parse
fn carry_over_ids(previous: &[Element], next: &mut [Element]) {
    for (old, new) in previous.iter().zip(next.iter_mut()) {
        if old.tag == new.tag && new.id.is_none() {
            new.id = old.id.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lander_common::LocalizedHtml;

    fn website(content: &str) -> Website {
        Website {
            id: 1,
            title: "新しいLP".into(),
            localized_html: vec![LocalizedHtml {
                id: 1,
                language: Language::JP,
                content: content.into(),
            }],
            created_at: Default::default(),
            updated_at: Default::default(),
        }
    }

    fn open(content: &str) -> EditorSession {
        EditorSession::open(&website(content), Language::JP, SessionOptions::default())
    }

    #[test]
    fn test_open_parses_active_language() {
        let session = open("<h1>Hi</h1><p>there</p>");
        assert_eq!(session.mode(), Mode::Visual);
        assert_eq!(session.elements().len(), 2);
        assert_eq!(session.html(), "<h1>Hi</h1><p>there</p>");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_open_missing_language_creates_entry() {
        let session = EditorSession::open(&website("<p>x</p>"), Language::TW, SessionOptions::default());
        assert!(session.elements().is_empty());
        assert_eq!(session.documents().content(Language::TW), Some(""));
        assert_eq!(session.documents().content(Language::JP), Some("<p>x</p>"));
    }

    #[test]
    fn test_mode_round_trip_without_edits_is_identity() {
        let mut session = open("<h1>Hi</h1><img alt=\"a\">");
        let elements = session.elements().to_vec();
        let html = session.html().to_string();

        session.switch_mode();
        assert_eq!(session.mode(), Mode::Code);
        assert_eq!(session.code(), html);
        assert_eq!(session.selection(), Selection::caret(html.chars().count()));

        session.switch_mode();
        assert_eq!(session.mode(), Mode::Visual);
        assert_eq!(session.elements(), elements.as_slice());
        assert_eq!(session.html(), html);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_mode_transitions_are_idempotent() {
        let mut session = open("<p>x</p>");
        session.enter_visual_mode();
        assert_eq!(session.mode(), Mode::Visual);

        session.enter_code_mode();
        session.code_input("<p>y</p>", Selection::caret(4)).unwrap();
        session.enter_code_mode();
        assert_eq!(session.code(), "<p>y</p>");
    }

    #[test]
    fn test_code_edit_replaces_model() {
        let mut session = open("<p>x</p>");
        session.enter_code_mode();
        session.code_input("<div><span>", Selection::caret(11)).unwrap();
        assert_eq!(session.elements()[0].tag, "p");

        session.enter_visual_mode();
        assert_eq!(session.elements().len(), 1);
        assert_eq!(session.elements()[0].tag, "div");
        assert_eq!(session.html(), "<div><span></span></div>");
        assert_eq!(session.documents().content(Language::JP), Some("<div><span></span></div>"));
    }

    #[test]
    fn test_unparseable_code_keeps_model() {
        let mut session = open("<h1>keep</h1>");
        session.enter_code_mode();
        session.code_input("just some text", Selection::caret(4)).unwrap();
        session.enter_visual_mode();

        assert_eq!(session.mode(), Mode::Visual);
        assert_eq!(session.html(), "<h1>keep</h1>");
        assert_eq!(session.documents().content(Language::JP), Some("<h1>keep</h1>"));
    }

    #[test]
    fn test_selection_survives_rehighlight() {
        let mut session = open("");
        session.enter_code_mode();
        session.code_input("abc", Selection::caret(2)).unwrap();
        assert_eq!(session.selection(), Selection::caret(2));
        assert!(session.highlighted_code().contains("cursor-blink"));
    }

    #[test]
    fn test_enter_inserts_one_newline() {
        let mut session = open("");
        session.enter_code_mode();
        session.code_input("<p></p>", Selection::caret(3)).unwrap();
        session.code_key_enter().unwrap();

        assert_eq!(session.code(), "<p>\n</p>");
        assert_eq!(session.selection(), Selection::caret(4));
        assert_eq!(session.line_numbers(), vec!["1", "2"]);
    }

    #[test]
    fn test_wrong_mode_is_rejected() {
        let mut session = open("");
        assert!(matches!(
            session.code_input("x", Selection::caret(1)),
            Err(EditorError::WrongMode { expected: Mode::Code, actual: Mode::Visual })
        ));

        session.enter_code_mode();
        assert!(session.drop_palette_item(PaletteItem::Heading).is_err());
    }

    #[test]
    fn test_drop_palette_items() {
        let mut session = open("");
        session.drop_palette_item(PaletteItem::Heading).unwrap();
        session.drop_palette_item(PaletteItem::Image).unwrap();

        assert_eq!(session.html(), r#"<h1>ここにテキスト</h1><img src="/noimage.png" />"#);
        assert!(session.is_dirty());
        assert_eq!(session.documents().content(Language::JP), Some(session.html()));
    }

    #[test]
    fn test_click_to_quick_edit() {
        let mut session = open("<h1>Title</h1><p class=\"lead\">Body</p>");
        let render = session.render().clone();
        assert!(render.html.contains("data-lander-node=\"node-2\""));

        let panel = session.click_rendered("node-2").unwrap();
        assert_eq!(panel.tag, "p");
        assert_eq!(panel.text, "Body");

        session.quick_edit_set_text("New & improved").unwrap();
        session.quick_edit_set_attribute("id", "intro").unwrap();
        assert!(session.quick_edit_remove_attribute("class").unwrap());
        assert_eq!(
            session.html(),
            "<h1>Title</h1><p id=\"intro\">New &amp; improved</p>"
        );

        session.close_quick_edit();
        assert!(matches!(
            session.quick_edit_set_text("x"),
            Err(EditorError::QuickEditClosed)
        ));
        assert!(matches!(
            session.click_rendered("node-9"),
            Err(EditorError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_ids_survive_code_round_trip() {
        let mut session = open("<h1>a</h1>");
        session.render();
        let id = session.elements()[0].id.clone();
        assert!(id.is_some());

        session.enter_code_mode();
        session.code_input("<h1>b</h1>", Selection::caret(0)).unwrap();
        session.enter_visual_mode();
        assert_eq!(session.elements()[0].id, id);
    }

    #[test]
    fn test_language_isolation() {
        let mut session = open("<h1>日本語</h1>");
        session.drop_palette_item(PaletteItem::Paragraph).unwrap();
        let jp = session.html().to_string();

        session.select_language(Language::EN);
        assert_eq!(session.language(), Language::EN);
        assert!(session.elements().is_empty());
        session.drop_palette_item(PaletteItem::Heading).unwrap();

        assert_eq!(session.documents().content(Language::JP), Some(jp.as_str()));
        assert_eq!(session.documents().content(Language::EN), Some("<h1>ここにテキスト</h1>"));

        session.select_language(Language::JP);
        assert_eq!(session.html(), jp);
    }

    #[test]
    fn test_language_switch_commits_code_verbatim() {
        let mut session = open("");
        session.enter_code_mode();
        session.code_input("<p>draft", Selection::caret(8)).unwrap();
        session.select_language(Language::CN);

        assert_eq!(session.mode(), Mode::Visual);
        assert_eq!(session.documents().content(Language::JP), Some("<p>draft"));
    }

    #[test]
    fn test_set_title_leaves_content() {
        let mut session = open("<p>x</p>");
        session.set_title("Summer sale");
        assert_eq!(session.title(), "Summer sale");
        assert!(!session.is_dirty());
        assert_eq!(session.documents().content(Language::JP), Some("<p>x</p>"));
    }
}
