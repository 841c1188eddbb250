//! Markdown renderer: table of contents, type table, variable
//! cross-reference listings, and the section/function body.

use crate::model::*;
use crate::render::Renderer;
use crate::toc;
use std::collections::{BTreeMap, BTreeSet};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();

        render_index(&mut out, doc);
        render_types(&mut out, doc);
        render_variables(&mut out, "Variables referenced", &doc.xref.read_by);
        render_variables(&mut out, "Variables set", &doc.xref.written_by);

        for entry in &doc.entries {
            match entry {
                Entry::Section(section) => render_section(&mut out, section),
                Entry::Function(func) => render_function(&mut out, func),
            }
        }

        out
    }
}

fn render_index(out: &mut String, doc: &Document) {
    if doc.is_empty() {
        return;
    }
    out.push_str("## Index\n\n");
    for func in doc.functions() {
        out.push_str(&toc::render_toc_item(&func.name));
        out.push('\n');
    }
    for ty in &doc.types {
        out.push_str(&toc::render_toc_item(&ty.name));
        out.push('\n');
    }
    out.push('\n');
}

fn render_types(out: &mut String, doc: &Document) {
    if doc.types.is_empty() {
        return;
    }
    out.push_str("## Types\n\n");
    out.push_str("| Name | Location |\n");
    out.push_str("| ---- | -------- |\n");
    for ty in &doc.types {
        out.push_str(&format!("| `{}` | {} |\n", ty.name, ty.location));
    }
    out.push('\n');
}

fn render_variables(out: &mut String, title: &str, index: &BTreeMap<String, BTreeSet<String>>) {
    if index.is_empty() {
        return;
    }
    out.push_str(&format!("## {title}\n\n"));
    for (var, funcs) in index {
        let links: Vec<String> = funcs.iter().map(|f| toc::render_link(f)).collect();
        out.push_str(&format!("* **{}**: {}\n", var, links.join(", ")));
    }
    out.push('\n');
}

fn render_section(out: &mut String, section: &SectionEntry) {
    out.push_str(&format!("## {}\n\n", section.title));
    if let Some(desc) = &section.description {
        out.push_str(desc);
        out.push_str("\n\n");
    }
}

fn render_function(out: &mut String, func: &FunctionEntry) {
    out.push_str(&format!("### {}\n\n", func.name));

    if let Some(desc) = &func.description {
        out.push_str(desc);
        out.push_str("\n\n");
    }

    if !func.args.is_empty() {
        out.push_str("#### Arguments\n\n");
        out.push_str("| Name | Type | Description |\n");
        out.push_str("| ---- | ---- | ----------- |\n");
        for arg in &func.args {
            out.push_str(&format!(
                "| `{}` | {} | {} |\n",
                arg.name, arg.type_name, arg.description
            ));
        }
        out.push('\n');
    }

    if func.noargs {
        out.push_str("_Function has no arguments._\n\n");
    }

    if !func.env_reads.is_empty() {
        out.push_str("#### Environment variables\n\n");
        for var in &func.env_reads {
            out.push_str(&format!("* `{var}`\n"));
        }
        out.push('\n');
    }

    if !func.var_writes.is_empty() {
        out.push_str("#### Variables set\n\n");
        for var in &func.var_writes {
            out.push_str(&format!("* `{var}`\n"));
        }
        out.push('\n');
    }

    if !func.see_also.is_empty() {
        out.push_str("#### See also\n\n");
        for see in &func.see_also {
            out.push_str(&format!("* {}\n", toc::render_link(see)));
        }
        out.push('\n');
    }
}
