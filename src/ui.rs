use crate::language::LanguageTable;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{TITLE}}</title>
<style>
  body { font-family: 'Segoe UI', sans-serif; background-color: #f4f4f4; padding: 40px; margin: 0; }
  h1 { color: black; font-size: 28px; margin-bottom: 30px; text-align: center; }
  .row { display: flex; gap: 32px; flex-wrap: wrap; }
  .column { flex: 1; min-width: 280px; display: flex; flex-direction: column; gap: 12px; }
  label { font-weight: 600; }
  textarea, select { font: inherit; padding: 8px; border: 1px solid #ccc; border-radius: 6px; }
  button { font-size: 16px; padding: 10px 20px; border: 0; border-radius: 6px; background: #f97316; color: white; cursor: pointer; }
  button:disabled { opacity: 0.6; cursor: progress; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<div class="row">
  <div class="column">
    <label for="input-text">Enter Text</label>
    <textarea id="input-text" rows="4" placeholder="Type something to translate..."></textarea>
    <label for="source-language">Source Language</label>
    <select id="source-language">{{SOURCE_OPTIONS}}</select>
    <label for="target-language">Target Language</label>
    <select id="target-language">{{TARGET_OPTIONS}}</select>
    <button id="translate-button" type="button">Translate</button>
  </div>
  <div class="column">
    <label for="output-text">Translated Text</label>
    <textarea id="output-text" rows="6" readonly></textarea>
    <label for="audio-output">Speak Translation</label>
    <audio id="audio-output" controls autoplay></audio>
  </div>
</div>
<script>
(function () {
  const button = document.getElementById("translate-button");
  const output = document.getElementById("output-text");
  const audio = document.getElementById("audio-output");
  let currentClip = null;

  function release() {
    if (currentClip) {
      fetch("/api/audio/" + currentClip, { method: "DELETE" }).catch(() => {});
      currentClip = null;
    }
  }

  audio.addEventListener("ended", release);

  button.addEventListener("click", async () => {
    button.disabled = true;
    release();
    audio.removeAttribute("src");
    try {
      const response = await fetch("/api/translate", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({
          text: document.getElementById("input-text").value,
          source_language: document.getElementById("source-language").value,
          target_language: document.getElementById("target-language").value,
        }),
      });
      const result = await response.json();
      output.value = result.display_text;
      if (result.audio_url) {
        currentClip = result.audio_id;
        audio.src = result.audio_url;
        audio.play().catch(() => {});
      }
    } catch (e) {
      output.value = "Request failed: " + e;
    } finally {
      button.disabled = false;
    }
  });
})();
</script>
</body>
</html>
"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn language_options(languages: &LanguageTable, selected: &str) -> String {
    languages
        .names()
        .map(|name| {
            let name_html = escape_html(name);
            let marker = if name == selected { " selected" } else { "" };
            format!("<option value=\"{name_html}\"{marker}>{name_html}</option>")
        })
        .collect()
}

/// Render the translator form
pub fn render_page(
    title: &str,
    languages: &LanguageTable,
    default_source: &str,
    default_target: &str,
) -> String {
    PAGE.replace("{{TITLE}}", &escape_html(title))
        .replace("{{SOURCE_OPTIONS}}", &language_options(languages, default_source))
        .replace("{{TARGET_OPTIONS}}", &language_options(languages, default_target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LanguageTable {
        LanguageTable::parse(
            r#"[
                {"Language": "English", "FLORES-200 code": "eng_Latn"},
                {"Language": "French", "FLORES-200 code": "fra_Latn"},
                {"Language": "Bosnian <test>", "FLORES-200 code": "bos_Latn"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn dropdowns_select_defaults() {
        let page = render_page("Translator", &table(), "English", "French");
        assert!(page.contains(r#"<select id="source-language"><option value="English" selected>English</option><option value="French">French</option>"#));
        assert!(page.contains(r#"<select id="target-language"><option value="English">English</option><option value="French" selected>French</option>"#));
    }

    #[test]
    fn names_and_title_are_escaped() {
        let page = render_page("A & B", &table(), "English", "French");
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("Bosnian &lt;test&gt;"));
        assert!(!page.contains("Bosnian <test>"));
    }

    #[test]
    fn empty_table_renders_empty_dropdowns() {
        let page = render_page("T", &LanguageTable::default(), "English", "French");
        assert!(page.contains(r#"<select id="source-language"></select>"#));
        assert!(page.contains(r#"<audio id="audio-output" controls autoplay></audio>"#));
    }
}
