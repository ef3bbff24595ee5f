//! Server-side HTML rendering
//!
//! Pages are rendered from the core's view model so the markup matches what the
//! browser shell shows once it takes over.

use crate::{config::SiteConfig, services::results::PageMetadata};
use nopasswords_core::{
    GenerationResult, OutputView, RESULT_ELEMENT_ID, ViewModel,
    commands::download::QR_CODE_FILENAME,
};
use std::fmt::Write as _;

pub const SHELL_SCRIPT: &str = "/static/shell.js";

const STYLE: &str = r#"
        * { box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 16px; color: #111; }
        .container { max-width: 72rem; margin: 40px auto; display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 48px; }
        h1 { font-size: 1.875rem; margin-bottom: 2.5rem; }
        label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; }
        input, select, textarea { width: 100%; padding: 8px 12px; border: 1px solid #ddd; border-radius: 6px; font-size: 14px; }
        textarea { resize: none; }
        .field { margin-bottom: 16px; }
        .field-error { color: #dc2626; font-size: 13px; margin-top: 4px; }
        .hint { color: #666; font-size: 13px; margin-top: 4px; }
        button, .button { display: inline-block; padding: 10px 16px; border-radius: 6px; border: 1px solid #111; background: #111; color: #fff; font-size: 14px; cursor: pointer; text-decoration: none; }
        .button.outline { background: #fff; color: #111; }
        .submit { display: block; width: 100%; max-width: 200px; margin: 8px auto; }
        .alert { border: 1px solid #dc2626; color: #dc2626; border-radius: 6px; padding: 12px; margin-top: 16px; }
        .qr { display: flex; flex-direction: column; align-items: center; gap: 8px; }
        .qr img { width: 510px; max-width: 100%; aspect-ratio: 1; border: 1px solid #ccc; border-radius: 4px; }
        .placeholder { width: 510px; max-width: 100%; aspect-ratio: 1; background: #9ca3af; border-radius: 4px; }
        .downloads { display: flex; justify-content: center; gap: 20px; margin-top: 16px; }
"#;

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Options shared by all rendered pages
#[derive(Clone, Debug)]
pub struct PageOptions<'a> {
    pub site: &'a SiteConfig,
    /// Include the browser shell script
    pub with_shell: bool,
}

/// Render the generation form page
///
/// `metadata` is set for results pages, `result` is handed to the shell so it
/// can initialize the core with the same data the page was rendered from.
pub fn form_page(
    view: &ViewModel,
    metadata: Option<&PageMetadata>,
    result: &GenerationResult,
    options: &PageOptions,
) -> String {
    let title = metadata
        .map(|metadata| metadata.title.clone())
        .unwrap_or_else(|| options.site.name.clone());

    let mut head = String::new();
    if let Some(metadata) = metadata {
        head.push_str(&meta_tags(metadata));
    }
    if options.with_shell {
        head.push_str(&shell_tags(result));
    }

    let body = format!(
        r#"<div id="gen-qr" class="container">
    <div>
        <h1>Generate a Wifi QR Code</h1>
{form}
    </div>
    <div>
{output}
    </div>
</div>"#,
        form = form(view),
        output = output(&view.output),
    );

    document(&title, &head, &body)
}

/// Render the 404 page, without metadata and without the form
pub fn not_found_page(site: &SiteConfig) -> String {
    document(
        &format!("404: This page could not be found | {}", site.name),
        "",
        r#"<div class="container"><h1>404</h1><p>This page could not be found.</p></div>"#,
    )
}

fn document(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{head}    <style>{STYLE}    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn meta_tags(metadata: &PageMetadata) -> String {
    let title = escape(&metadata.title);
    let description = escape(&metadata.description);
    let image = escape(&metadata.image);

    format!(
        r#"    <meta name="description" content="{description}">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:image" content="{image}">
    <meta name="twitter:card" content="{card}">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{image}">
    <meta name="twitter:creator" content="{creator}">
"#,
        card = metadata.twitter_card,
        creator = escape(&metadata.twitter_creator),
    )
}

fn shell_tags(result: &GenerationResult) -> String {
    // "</" would end the script element early
    let result = serde_json::to_string(result)
        .unwrap_or_else(|_| "\"NoResult\"".to_string())
        .replace("</", "<\\/");

    format!(
        r#"    <script id="{RESULT_ELEMENT_ID}" type="application/json">{result}</script>
    <script type="module" src="{SHELL_SCRIPT}"></script>
"#
    )
}

fn form(view: &ViewModel) -> String {
    let disabled = if view.is_loading { " disabled" } else { "" };

    let encryption_options = view
        .encryption_options
        .iter()
        .fold(String::new(), |mut options, option| {
            let selected = if option.value == view.form.encryption {
                " selected"
            } else {
                ""
            };
            let _ = write!(
                options,
                r#"<option value="{}"{selected}>{}</option>"#,
                escape(&option.value),
                escape(&option.label)
            );
            options
        });

    let suggestions = view
        .suggestions
        .iter()
        .fold(String::new(), |mut options, suggestion| {
            let suggestion = escape(suggestion);
            let _ = write!(options, r#"<option value="{suggestion}">{suggestion}</option>"#);
            options
        });

    let submit_label = if view.is_loading {
        "..."
    } else {
        view.submit_label.as_str()
    };

    let error = view
        .error_message
        .as_deref()
        .map(|message| {
            format!(
                r#"<div class="alert" role="alert"><strong>Error</strong><p>{}</p></div>"#,
                escape(message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"        <form method="post" action="/">
            <div class="field">
                <label for="wifi_name">Wifi Network Name (SSID)</label>
                <input id="wifi_name" name="wifi_name" placeholder="infinity_5g" value="{wifi_name}">
                {wifi_name_error}
            </div>
            <div class="field">
                <label for="wifi_password">Wifi Password</label>
                <input id="wifi_password" name="wifi_password" placeholder="..." value="{wifi_password}">
                {wifi_password_error}
            </div>
            <div class="field">
                <label for="encryption">Encyption <i>(Default WPA should work for most)</i></label>
                <select id="encryption" name="encryption">{encryption_options}</select>
                {encryption_error}
            </div>
            <div class="field">
                <label for="prompt">Prompt</label>
                <textarea id="prompt" name="prompt" placeholder="Japanese idyllic town">{prompt}</textarea>
                <p class="hint">This is what the image in your QR code will look like.</p>
                {prompt_error}
            </div>
            <div class="field">
                <label for="suggestion">Prompt suggestions</label>
                <select id="suggestion"{disabled}><option value="" selected>for some inspiration...</option>{suggestions}</select>
            </div>
            <button type="submit" class="submit"{disabled}>{submit_label}</button>
            {error}
        </form>"#,
        wifi_name = escape(&view.form.wifi_name),
        wifi_password = escape(&view.form.wifi_password),
        prompt = escape(&view.form.prompt),
        wifi_name_error = field_error(view, "wifi_name"),
        wifi_password_error = field_error(view, "wifi_password"),
        encryption_error = field_error(view, "encryption"),
        prompt_error = field_error(view, "prompt"),
        submit_label = escape(submit_label),
    )
}

fn field_error(view: &ViewModel, field: &str) -> String {
    view.field_errors
        .get(field)
        .map(|message| format!(r#"<p class="field-error">{}</p>"#, escape(message)))
        .unwrap_or_default()
}

fn output(output: &OutputView) -> String {
    let panel = match output {
        OutputView::Hidden => return String::new(),
        OutputView::Placeholder => r#"<div class="placeholder"></div>"#.to_string(),
        OutputView::QrCode {
            image_url,
            download_url,
            time,
        } => format!(
            r#"<div class="qr">
            <img src="{image_url}" alt="qr code">
            <p>QR Code generated in {time} seconds</p>
        </div>
        <div class="downloads">
            <a class="button" href="{download_url}" download="{QR_CODE_FILENAME}">Download With Password</a>
            <a class="button outline" href="{image_url}" download="{QR_CODE_FILENAME}">Download Without Password</a>
        </div>"#,
            image_url = escape(image_url),
            download_url = escape(download_url),
            time = escape(time),
        ),
    };

    format!(
        r#"        <h1>Your Wifi QR Code</h1>
        {panel}"#
    )
}
