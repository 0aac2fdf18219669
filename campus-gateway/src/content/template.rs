use std::collections::HashMap;

use super::ContentError;

pub type TemplateVars = HashMap<String, String>;

pub fn vars_from_pairs(pairs: &[(&str, &str)]) -> TemplateVars {
    let mut vars = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    vars
}

pub fn render_template(template: &str, vars: &TemplateVars) -> Result<String, ContentError> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let (prefix, after_start) = rest.split_at(start);
        out.push_str(prefix);
        let Some(end) = after_start.find("}}") else {
            return Err(ContentError::TemplateParse("Unclosed {{ in template".to_string()));
        };
        let var = &after_start[2..end].trim();
        if var.is_empty() {
            return Err(ContentError::TemplateParse("Empty {{}} in template".to_string()));
        }
        let value = vars
            .get(*var)
            .ok_or_else(|| ContentError::MissingVar(var.to_string()))?;
        out.push_str(value);
        rest = &after_start[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Split `+++` delimited TOML front matter from the body.
pub(crate) fn split_front_matter(text: &str) -> Result<(String, String), ContentError> {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return Err(ContentError::Parse("Missing front matter".to_string()));
    };
    if first.trim() != "+++" {
        return Err(ContentError::Parse("Front matter must start with +++".to_string()));
    }

    let mut front = Vec::new();
    for line in &mut lines {
        if line.trim() == "+++" {
            let body = lines.collect::<Vec<_>>().join("\n");
            return Ok((front.join("\n"), body));
        }
        front.push(line);
    }

    Err(ContentError::Parse("Front matter must end with +++".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_substitutes_vars() {
        let vars = vars_from_pairs(&[("institution", "CUNY"), ("office", "Admissions")]);
        let rendered = render_template("{{ institution }} / {{office}}!", &vars).unwrap();
        assert_eq!(rendered, "CUNY / Admissions!");
    }

    #[test]
    fn test_render_template_errors() {
        let vars = vars_from_pairs(&[]);
        assert!(matches!(
            render_template("Hello {{name}}", &vars),
            Err(ContentError::MissingVar(name)) if name == "name"
        ));
        assert!(matches!(
            render_template("Hello {{name", &vars),
            Err(ContentError::TemplateParse(_))
        ));
        assert!(matches!(
            render_template("Hello {{ }}", &vars),
            Err(ContentError::TemplateParse(_))
        ));
    }

    #[test]
    fn test_split_front_matter() {
        let (front, body) = split_front_matter("+++\nid = \"x\"\n+++\nline one\nline two\n").unwrap();
        assert_eq!(front, "id = \"x\"");
        assert_eq!(body, "line one\nline two");

        assert!(split_front_matter("no front matter").is_err());
        assert!(split_front_matter("+++\nid = \"x\"\n").is_err());
    }
}
