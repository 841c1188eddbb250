//! JSON renderer — structural output of the document model for tooling.

use crate::model::*;
use crate::render::Renderer;
use std::collections::{BTreeMap, BTreeSet};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        out.push_str("{\n");

        out.push_str("  \"entries\": [\n");
        for (i, entry) in doc.entries.iter().enumerate() {
            match entry {
                Entry::Section(section) => render_section(&mut out, section),
                Entry::Function(func) => render_function(&mut out, func),
            }
            out.push_str(if i + 1 < doc.entries.len() { ",\n" } else { "\n" });
        }
        out.push_str("  ],\n");

        out.push_str("  \"types\": [\n");
        for (i, ty) in doc.types.iter().enumerate() {
            out.push_str(&format!(
                "    {{ \"name\": \"{}\", \"location\": \"{}\" }}",
                escape(&ty.name),
                escape(&ty.location.to_string())
            ));
            out.push_str(if i + 1 < doc.types.len() { ",\n" } else { "\n" });
        }
        out.push_str("  ],\n");

        out.push_str("  \"variables\": {\n");
        render_xref(&mut out, "read_by", &doc.xref.read_by, true);
        render_xref(&mut out, "written_by", &doc.xref.written_by, false);
        out.push_str("  }\n");

        out.push_str("}\n");
        out
    }
}

fn render_section(out: &mut String, section: &SectionEntry) {
    out.push_str("    {\n");
    out.push_str("      \"kind\": \"section\",\n");
    out.push_str(&format!("      \"title\": \"{}\",\n", escape(&section.title)));
    if let Some(desc) = &section.description {
        out.push_str(&format!("      \"description\": \"{}\",\n", escape(desc)));
    }
    out.push_str(&format!(
        "      \"location\": \"{}\"\n",
        escape(&section.location.to_string())
    ));
    out.push_str("    }");
}

fn render_function(out: &mut String, func: &FunctionEntry) {
    out.push_str("    {\n");
    out.push_str("      \"kind\": \"function\",\n");
    out.push_str(&format!("      \"name\": \"{}\",\n", escape(&func.name)));
    if let Some(desc) = &func.description {
        out.push_str(&format!("      \"description\": \"{}\",\n", escape(desc)));
    }
    if !func.args.is_empty() {
        out.push_str("      \"args\": [\n");
        for (i, arg) in func.args.iter().enumerate() {
            out.push_str(&format!(
                "        {{ \"name\": \"{}\", \"type\": \"{}\", \"description\": \"{}\" }}",
                escape(&arg.name),
                escape(&arg.type_name),
                escape(&arg.description)
            ));
            out.push_str(if i + 1 < func.args.len() { ",\n" } else { "\n" });
        }
        out.push_str("      ],\n");
    }
    if func.noargs {
        out.push_str("      \"noargs\": true,\n");
    }
    if !func.env_reads.is_empty() {
        write_string_array(out, "env", &func.env_reads);
    }
    if !func.var_writes.is_empty() {
        write_string_array(out, "set", &func.var_writes);
    }
    if !func.see_also.is_empty() {
        write_string_array(out, "see", &func.see_also);
    }
    out.push_str(&format!(
        "      \"location\": \"{}\"\n",
        escape(&func.location.to_string())
    ));
    out.push_str("    }");
}

fn render_xref(
    out: &mut String,
    name: &str,
    index: &BTreeMap<String, BTreeSet<String>>,
    trailing_comma: bool,
) {
    out.push_str(&format!("    \"{name}\": {{"));
    if index.is_empty() {
        out.push_str("}");
    } else {
        out.push('\n');
        for (i, (var, funcs)) in index.iter().enumerate() {
            let list: Vec<String> = funcs.iter().map(|f| format!("\"{}\"", escape(f))).collect();
            out.push_str(&format!("      \"{}\": [{}]", escape(var), list.join(", ")));
            out.push_str(if i + 1 < index.len() { ",\n" } else { "\n" });
        }
        out.push_str("    }");
    }
    out.push_str(if trailing_comma { ",\n" } else { "\n" });
}

fn write_string_array(out: &mut String, name: &str, items: &[String]) {
    let list: Vec<String> = items.iter().map(|s| format!("\"{}\"", escape(s))).collect();
    out.push_str(&format!("      \"{}\": [{}],\n", name, list.join(", ")));
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
