use crate::app::response::FormView;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Titanic survival predictor</title>
</head>
<body>
<h1>Titanic survival predictor</h1>
<form action="/predict_form" method="post">
  <label>Class
    <select name="Pclass">
      <option value="1">1</option>
      <option value="2">2</option>
      <option value="3">3</option>
    </select>
  </label>
  <label>Sex
    <select name="Sex">
      <option value="female">female</option>
      <option value="male">male</option>
    </select>
  </label>
  <label>Age <input type="text" name="Age" required></label>
  <button type="submit">Predict</button>
</form>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

pub fn render_page(view: &FormView) -> String {
    let mut html = String::from(PAGE_HEAD);
    if let Some(result) = &view.result {
        html.push_str(&format!("<h2 id=\"result\">{}</h2>\n", escape_html(result)));
    }
    if let Some(explanation) = &view.explanation {
        html.push_str(&format!(
            "<p id=\"explanation\">{}</p>\n",
            escape_html(explanation)
        ));
    }
    html.push_str(PAGE_TAIL);
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_view_renders_form_only() {
        let html = render_page(&FormView::default());
        assert!(html.contains("action=\"/predict_form\""));
        assert!(!html.contains("id=\"result\""));
        assert!(!html.contains("id=\"explanation\""));
    }

    #[test]
    fn test_result_and_explanation_are_escaped() {
        let html = render_page(&FormView {
            result: Some("Error: '<script>' is not an integer".to_string()),
            explanation: Some("A & B".to_string()),
        });
        assert!(html.contains("Error: &#39;&lt;script&gt;&#39; is not an integer"));
        assert!(html.contains("<p id=\"explanation\">A &amp; B</p>"));
    }
}
