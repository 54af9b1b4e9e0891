//! Widgets for the document fields, and the assets they depend on.
//!
//! Every document widget renders a hidden input named after the field next
//! to the visible inputs. Client-side scripts (listed in each widget's
//! [`Media`]) add and remove rows and, on submit, serialize the visible
//! inputs into the hidden one. The markup below is what those scripts hook
//! into: the `list_field_NAME` item inputs, the `div_list_field_NAME`
//! container, and the `id_add_NAME` button.

use std::collections::HashMap;

use mongoforms_core::utils::html::{escape_html, merge_attrs};
use mongoforms_core::SETTINGS;
use mongoforms_db::Value;

use crate::fields::FormFieldDef;
use crate::widgets::{create_widget, widget_for_field, Input, Widget, WidgetType};

const DEFAULT_ADD_BUTTON: &str = r#"<button id="id_add_{name}"> {label} </button>"#;
const DEFAULT_TABLE_WRAP: &str = r#"<table class="list_embedded_fields"> <thead> {head} </thead> <tbody> {body} </tbody> </table>"#;

/// Scripts and stylesheets a widget needs on the page.
///
/// Paths are relative to the `static_url` setting unless they are absolute.
///
/// # Examples
///
/// ```
/// use mongoforms_forms::Media;
///
/// let mut media = Media::new().with_js("a.js");
/// media.merge(&Media::new().with_js("a.js").with_css("a.css"));
/// assert_eq!(media.js(), &["a.js".to_string()]);
/// assert_eq!(media.css(), &["a.css".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    js: Vec<String>,
    css: Vec<String>,
}

impl Media {
    /// Creates an empty media set.
    pub const fn new() -> Self {
        Self {
            js: Vec::new(),
            css: Vec::new(),
        }
    }

    /// Adds a script.
    #[must_use]
    pub fn with_js(mut self, path: impl Into<String>) -> Self {
        push_unique(&mut self.js, path.into());
        self
    }

    /// Adds a stylesheet (media `all`).
    #[must_use]
    pub fn with_css(mut self, path: impl Into<String>) -> Self {
        push_unique(&mut self.css, path.into());
        self
    }

    /// The script paths, in order.
    pub fn js(&self) -> &[String] {
        &self.js
    }

    /// The stylesheet paths, in order.
    pub fn css(&self) -> &[String] {
        &self.css
    }

    /// Returns `true` if there is nothing to include.
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.css.is_empty()
    }

    /// Appends the assets of `other` that are not already present.
    pub fn merge(&mut self, other: &Self) {
        for path in &other.js {
            push_unique(&mut self.js, path.clone());
        }
        for path in &other.css {
            push_unique(&mut self.css, path.clone());
        }
    }

    /// Renders `<link>` and `<script>` tags using the configured static URL.
    pub fn render(&self) -> String {
        self.render_with(&SETTINGS.get_or_default().static_url)
    }

    /// Renders `<link>` and `<script>` tags against the given static URL.
    pub fn render_with(&self, static_url: &str) -> String {
        let links = self.css.iter().map(|path| {
            format!(
                r#"<link href="{}" media="all" rel="stylesheet">"#,
                escape_html(&absolute_path(static_url, path))
            )
        });
        let scripts = self.js.iter().map(|path| {
            format!(
                r#"<script src="{}"></script>"#,
                escape_html(&absolute_path(static_url, path))
            )
        });
        links.chain(scripts).collect::<Vec<_>>().join("\n")
    }

    fn for_widget(widget: &str) -> Self {
        Self::new()
            .with_js(format!("mongoforms/js/{widget}.js"))
            .with_css(format!("mongoforms/css/{widget}.css"))
    }
}

fn push_unique(paths: &mut Vec<String>, path: String) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn absolute_path(static_url: &str, path: &str) -> String {
    if path.starts_with('/') || path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if static_url.ends_with('/') {
        format!("{static_url}{path}")
    } else {
        format!("{static_url}/{path}")
    }
}

/// Substitutes `{key}` placeholders in a markup template.
///
/// Unknown placeholders and stray braces are copied unchanged, so markup
/// containing literal braces can be used as a template.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let slot = slots.iter().find(|(key, _)| {
            tail[1..].starts_with(key) && tail[1 + key.len()..].starts_with('}')
        });
        if let Some((key, value)) = slot {
            out.push_str(value);
            rest = &tail[key.len() + 2..];
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn add_button(template: &str, name: &str) -> String {
    let name = escape_html(name);
    let label = escape_html(&SETTINGS.get_or_default().add_button_label);
    fill(template, &[("name", name.as_str()), ("label", label.as_str())])
}

fn render_hidden(name: &str, attrs: &HashMap<String, String>) -> String {
    Input::hidden().render(name, &None, attrs)
}

fn render_sub_field(field: &FormFieldDef, attrs: &HashMap<String, String>) -> String {
    let value = field.initial.as_ref().and_then(Value::to_input_string);
    widget_for_field(field).render(&field.name, &value, attrs)
}

/// Renders a scalar list as one input per item plus an add button.
///
/// ```text
/// <div class="list_field"> HIDDEN <div id="div_list_field_NAME">ITEMS</div> BUTTON </div>
/// ```
#[derive(Debug, Clone)]
pub struct ListFieldWidget {
    /// The widget rendered for every item.
    pub item_widget: WidgetType,
    /// Markup of the add button; `{name}` and `{label}` are substituted.
    pub add_button: String,
    /// Attributes given to every item input.
    pub attrs: HashMap<String, String>,
}

impl Default for ListFieldWidget {
    fn default() -> Self {
        Self {
            item_widget: WidgetType::TextInput,
            add_button: DEFAULT_ADD_BUTTON.to_string(),
            attrs: HashMap::new(),
        }
    }
}

impl ListFieldWidget {
    /// Uses another widget for the items.
    #[must_use]
    pub fn with_item_widget(mut self, widget: WidgetType) -> Self {
        self.item_widget = widget;
        self
    }

    /// Uses another add-button template.
    #[must_use]
    pub fn with_add_button(mut self, template: impl Into<String>) -> Self {
        self.add_button = template.into();
        self
    }

    /// Sets the attributes given to every item input.
    #[must_use]
    pub fn with_attrs(mut self, attrs: HashMap<String, String>) -> Self {
        self.attrs = attrs;
        self
    }

    /// The assets this widget needs.
    pub fn media(&self) -> Media {
        Media::for_widget("list_field_widget")
    }

    /// Renders the item inputs inside their container.
    pub fn render_list_field(&self, name: &str, items: &[String]) -> String {
        let list_field_name = format!("list_field_{name}");
        let widget = create_widget(&self.item_widget);
        let inputs: String = items
            .iter()
            .map(|item| widget.render(&list_field_name, &Some(item.clone()), &self.attrs))
            .collect();
        format!(
            r#"<div id="div_{}">{inputs}</div>"#,
            escape_html(&list_field_name)
        )
    }

    /// Renders the whole widget for the prepared items.
    pub fn render(&self, name: &str, items: &[String], attrs: &HashMap<String, String>) -> String {
        format!(
            r#"<div class="list_field"> {} {} {} </div>"#,
            render_hidden(name, attrs),
            self.render_list_field(name, items),
            add_button(&self.add_button, name)
        )
    }
}

/// Renders the sub-field inputs of an embedded document.
///
/// ```text
/// <div class="embedded_fields"> HIDDEN  <p><label for="NAME_id_SUB">LABEL:</label> INPUT</p>... </div>
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedModelFieldWidget {
    /// Attributes given to every sub-field input.
    pub attrs: HashMap<String, String>,
}

impl EmbeddedModelFieldWidget {
    /// Sets the attributes given to every sub-field input.
    #[must_use]
    pub fn with_attrs(mut self, attrs: HashMap<String, String>) -> Self {
        self.attrs = attrs;
        self
    }

    /// The assets this widget needs.
    pub fn media(&self) -> Media {
        Media::for_widget("embedded_model_field_widget")
    }

    /// Renders one labelled paragraph per sub-field.
    pub fn render_embedded_fields(&self, name: &str, fields: &[FormFieldDef]) -> String {
        fields
            .iter()
            .map(|field| {
                let field_id = format!("{name}_id_{}", field.name);
                let mut id_attr = HashMap::new();
                id_attr.insert("id".to_string(), field_id.clone());
                let attrs = merge_attrs(&self.attrs, &id_attr);
                format!(
                    r#"<p><label for="{}">{}:</label> {}</p>"#,
                    escape_html(&field_id),
                    escape_html(&field.label),
                    render_sub_field(field, &attrs)
                )
            })
            .collect()
    }

    /// Renders the whole widget for the prepared sub-field set.
    pub fn render(
        &self,
        name: &str,
        fields: &[FormFieldDef],
        attrs: &HashMap<String, String>,
    ) -> String {
        format!(
            r#"<div class="embedded_fields"> {}  {} </div>"#,
            render_hidden(name, attrs),
            self.render_embedded_fields(name, fields)
        )
    }
}

/// Renders a list of embedded documents as a table, one row per document.
///
/// ```text
/// <div class="list_embedded_fields"> HIDDEN TABLE BUTTON </div>
/// ```
#[derive(Debug, Clone)]
pub struct ListEmbeddedModelFieldWidget {
    /// Attributes given to every sub-field input.
    pub attrs: HashMap<String, String>,
    /// Markup wrapping the rows; `{head}` and `{body}` are substituted.
    pub wrap: String,
    /// Markup of the add button; `{name}` and `{label}` are substituted.
    pub add_button: String,
}

impl Default for ListEmbeddedModelFieldWidget {
    fn default() -> Self {
        Self {
            attrs: HashMap::new(),
            wrap: DEFAULT_TABLE_WRAP.to_string(),
            add_button: DEFAULT_ADD_BUTTON.to_string(),
        }
    }
}

impl ListEmbeddedModelFieldWidget {
    /// Uses another wrap template.
    #[must_use]
    pub fn with_wrap(mut self, template: impl Into<String>) -> Self {
        self.wrap = template.into();
        self
    }

    /// Uses another add-button template.
    #[must_use]
    pub fn with_add_button(mut self, template: impl Into<String>) -> Self {
        self.add_button = template.into();
        self
    }

    /// Sets the attributes given to every sub-field input.
    #[must_use]
    pub fn with_attrs(mut self, attrs: HashMap<String, String>) -> Self {
        self.attrs = attrs;
        self
    }

    /// The assets this widget needs.
    pub fn media(&self) -> Media {
        Media::for_widget("list_embedded_model_field_widget")
    }

    /// Builds the head row and the body rows.
    ///
    /// The head has one column per sub-field of the first row.
    pub fn render_list_field(&self, rows: &[Vec<FormFieldDef>]) -> (String, String) {
        let head = rows.first().map_or_else(String::new, |first| {
            let cols: String = first
                .iter()
                .map(|field| format!("<th> {} </th>", escape_html(&field.label)))
                .collect();
            format!("<tr> {cols} </tr>")
        });
        let body = rows
            .iter()
            .map(|row| {
                let cols: String = self
                    .render_embedded_fields(row)
                    .iter()
                    .map(|input| format!("<td> {input} </td>"))
                    .collect();
                format!("<tr> {cols} </tr>")
            })
            .collect();
        (head, body)
    }

    /// Renders the inputs of one row.
    pub fn render_embedded_fields(&self, row: &[FormFieldDef]) -> Vec<String> {
        row.iter()
            .map(|field| render_sub_field(field, &self.attrs))
            .collect()
    }

    /// Renders the whole widget for the prepared rows.
    pub fn render(
        &self,
        name: &str,
        rows: &[Vec<FormFieldDef>],
        attrs: &HashMap<String, String>,
    ) -> String {
        let (head, body) = self.render_list_field(rows);
        let table = fill(&self.wrap, &[("head", head.as_str()), ("body", body.as_str())]);
        format!(
            r#"<div class="list_embedded_fields"> {} {table} {} </div>"#,
            render_hidden(name, attrs),
            add_button(&self.add_button, name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;

    fn char_field(name: &str) -> FormFieldDef {
        FormFieldDef::new(
            name,
            FormFieldType::Char {
                min_length: None,
                max_length: None,
                strip: true,
            },
        )
    }

    fn id_attrs(id: &str) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        attrs.insert("id".to_string(), id.to_string());
        attrs
    }

    #[test]
    fn test_media_merge_keeps_order_without_duplicates() {
        let mut media = ListFieldWidget::default().media();
        media.merge(&EmbeddedModelFieldWidget::default().media());
        media.merge(&ListFieldWidget::default().media());
        assert_eq!(
            media.js(),
            &[
                "mongoforms/js/list_field_widget.js".to_string(),
                "mongoforms/js/embedded_model_field_widget.js".to_string(),
            ]
        );
        assert_eq!(media.css().len(), 2);
    }

    #[test]
    fn test_media_render_with() {
        let media = Media::new()
            .with_css("mongoforms/css/x.css")
            .with_js("mongoforms/js/x.js")
            .with_js("https://cdn.example.com/y.js");
        assert_eq!(
            media.render_with("/assets"),
            "<link href=\"/assets/mongoforms/css/x.css\" media=\"all\" rel=\"stylesheet\">\n\
             <script src=\"/assets/mongoforms/js/x.js\"></script>\n\
             <script src=\"https://cdn.example.com/y.js\"></script>"
        );
    }

    #[test]
    fn test_fill() {
        assert_eq!(fill("a {x} b {y}", &[("x", "1"), ("y", "2")]), "a 1 b 2");
        assert_eq!(fill("{unknown} {x", &[("x", "1")]), "{unknown} {x");
        assert_eq!(fill("{x}{x}", &[("x", "{x}")]), "{x}{x}");
    }

    #[test]
    fn test_list_field_widget_render() {
        let html = ListFieldWidget::default().render(
            "tags",
            &["a".to_string(), "b".to_string()],
            &id_attrs("id_tags"),
        );
        assert_eq!(
            html,
            concat!(
                r#"<div class="list_field"> "#,
                r#"<input type="hidden" name="tags" value="" id="id_tags" /> "#,
                r#"<div id="div_list_field_tags">"#,
                r#"<input type="text" name="list_field_tags" value="a" />"#,
                r#"<input type="text" name="list_field_tags" value="b" />"#,
                r#"</div> "#,
                r#"<button id="id_add_tags"> Add </button> </div>"#
            )
        );
    }

    #[test]
    fn test_list_field_widget_overrides() {
        let widget = ListFieldWidget::default()
            .with_item_widget(WidgetType::EmailInput)
            .with_add_button(r#"<a class="add" data-for="{name}">+</a>"#);
        let html = widget.render("emails", &[String::new()], &HashMap::new());
        assert!(html.contains(r#"<input type="email" name="list_field_emails" value="" />"#));
        assert!(html.contains(r#"<a class="add" data-for="emails">+</a>"#));
    }

    #[test]
    fn test_list_field_widget_escapes_name() {
        let html = ListFieldWidget::default().render(r#"x"><b>"#, &[], &HashMap::new());
        assert!(html.contains(r#"<div id="div_list_field_x&quot;&gt;&lt;b&gt;">"#));
        assert!(html.contains(r#"<button id="id_add_x&quot;&gt;&lt;b&gt;"> Add </button>"#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_embedded_widget_render() {
        let mut street = char_field("street").label("Street");
        street.initial = Some(Value::from("Via Po"));
        let number = char_field("number");
        let html = EmbeddedModelFieldWidget::default().render(
            "address",
            &[street, number],
            &id_attrs("id_address"),
        );
        assert_eq!(
            html,
            concat!(
                r#"<div class="embedded_fields"> "#,
                r#"<input type="hidden" name="address" value="" id="id_address" />  "#,
                r#"<p><label for="address_id_street">Street:</label> "#,
                r#"<input type="text" name="street" value="Via Po" id="address_id_street" /></p>"#,
                r#"<p><label for="address_id_number">number:</label> "#,
                r#"<input type="text" name="number" value="" id="address_id_number" /></p>"#,
                r#" </div>"#
            )
        );
    }

    #[test]
    fn test_embedded_widget_propagates_attrs() {
        let mut attrs = HashMap::new();
        attrs.insert("class".to_string(), "sub".to_string());
        let widget = EmbeddedModelFieldWidget::default().with_attrs(attrs);
        let html = widget.render_embedded_fields("address", &[char_field("street")]);
        assert!(html.contains(r#"class="sub" id="address_id_street""#));
    }

    #[test]
    fn test_list_embedded_widget_render() {
        let mut kind = char_field("kind");
        kind.initial = Some(Value::from("home"));
        let rows = vec![
            vec![kind, char_field("number")],
            vec![char_field("kind"), char_field("number")],
        ];
        let html = ListEmbeddedModelFieldWidget::default().render("phones", &rows, &HashMap::new());
        assert!(html.starts_with(
            r#"<div class="list_embedded_fields"> <input type="hidden" name="phones" value="" /> <table class="list_embedded_fields"> <thead> <tr> <th> kind </th><th> number </th> </tr> </thead> <tbody> "#
        ));
        assert!(html.contains(
            r#"<tr> <td> <input type="text" name="kind" value="home" /> </td><td> <input type="text" name="number" value="" /> </td> </tr>"#
        ));
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.ends_with(r#"</tbody> </table> <button id="id_add_phones"> Add </button> </div>"#));
    }

    #[test]
    fn test_list_embedded_widget_custom_wrap() {
        let widget = ListEmbeddedModelFieldWidget::default()
            .with_wrap(r#"<div class="rows">{body}</div>"#);
        let html = widget.render("phones", &[vec![char_field("kind")]], &HashMap::new());
        assert!(html.contains(r#"<div class="rows"><tr> <td> "#));
        assert!(!html.contains("<th>"));
    }

    #[test]
    fn test_list_embedded_widget_without_rows() {
        let (head, body) = ListEmbeddedModelFieldWidget::default().render_list_field(&[]);
        assert!(head.is_empty());
        assert!(body.is_empty());
    }
}
