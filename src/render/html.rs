//! HTML templates for the documentation report.
//!
//! Templates are registered under `.html` names, so minijinja escapes every
//! value interpolated into them. The only markup inserted verbatim is a
//! fragment that one of these templates rendered itself.

use std::sync::LazyLock;

use minijinja::{context, Environment, Error, Value};
use serde::Serialize;

const PAGE: &str = r#"<!doctype html>
<html>
    <head>
        <meta charset='utf-8'>
        <meta name="viewport" content="width=device-width">
        <title>{{ header.name }} - Documentation</title>
        <style>
            .annotation {
                white-space: pre-wrap;
            }
            .incomplete {
                color: #b00020;
            }
        </style>
    </head>
    <body>
        <header>
            <h1>{{ header.name }}</h1>
            <p>Version: {{ header.version }}</p>
            <p class='description'>{{ header.description }}</p>
{% if header.skipped > 0 %}
            <p class='incomplete'>
                Incomplete: {{ header.skipped }} workflow(s) could not be analyzed.
            </p>
{% endif %}
            <nav>
                <dl>
{{ toc }}
                </dl>
            </nav>
        </header>
        <main>
{{ main }}
{{ others }}
{{ failures }}
        </main>
    </body>
</html>
"#;

const TABLE_OF_CONTENTS: &str = r##"{% for entry in entries %}
                    <dt><a href="#{{ entry.id }}">{{ entry.label }}</a></dt>
                    <dd>{{ entry.path }}</dd>
{% endfor %}"##;

const SECTION: &str = r##"<h2 id="{{ id }}">{{ title }}</h2>
<p>File name: {{ path }}</p>
<p class='annotation'>{{ annotation }}</p>
<h3>Arguments</h3>
<table>
    <thead>
        <tr>
            <th>Name</th>
            <th>Direction</th>
            <th>Type</th>
            <th>Annotation</th>
        </tr>
    </thead>
    <tbody>
{% for arg in arguments %}
        <tr>
            <td>{{ arg.name }}</td>
            <td>{{ arg.direction }}</td>
            <td>{{ arg.type_name }}</td>
            <td class='annotation'>{{ arg.annotation }}</td>
        </tr>
{% endfor %}
    </tbody>
</table>
{% if variables %}
<h3>Variables</h3>
<table>
    <thead>
        <tr>
            <th>Name</th>
            <th>Type</th>
            <th>Default</th>
            <th>Annotation</th>
        </tr>
    </thead>
    <tbody>
{% for var in variables %}
        <tr>
            <td>{{ var.name }}</td>
            <td>{{ var.type_name }}</td>
            <td><code>{{ var.default_value }}</code></td>
            <td class='annotation'>{{ var.annotation }}</td>
        </tr>
{% endfor %}
    </tbody>
</table>
{% endif %}
{% if invocations %}
<h3>Invoked workflows</h3>
<ul>
{% for invocation in invocations %}
{% if invocation.target_id %}
    <li><a href="#{{ invocation.target_id }}">{{ invocation.path }}</a></li>
{% else %}
    <li>{{ invocation.path }}</li>
{% endif %}
{% endfor %}
</ul>
{% endif %}
"##;

const FAILURES: &str = r#"{% if failures %}
<h2 id="failed-workflows">Workflows that could not be analyzed</h2>
<ul>
{% for failure in failures %}
    <li><code>{{ failure.path }}</code>: {{ failure.message }}</li>
{% endfor %}
</ul>
{% endif %}"#;

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    for (name, source) in [
        ("page.html", PAGE),
        ("toc.html", TABLE_OF_CONTENTS),
        ("section.html", SECTION),
        ("failures.html", FAILURES),
    ] {
        env.add_template(name, source).expect("report templates are valid");
    }
    env
});

fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, Error> {
    TEMPLATES.get_template(name)?.render(ctx)
}

/// Title block data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageHeader<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub description: &'a str,
    /// Number of workflows left out of the report
    pub skipped: usize,
}

/// Rendered fragments that make up the page body.
#[derive(Debug, Clone, Copy)]
pub struct PageBody<'a> {
    pub toc: &'a str,
    pub main: &'a str,
    pub others: &'a str,
    pub failures: &'a str,
}

/// The whole report.
pub fn page(header: &PageHeader<'_>, body: &PageBody<'_>) -> Result<String, Error> {
    render(
        "page.html",
        context! {
            header => header,
            toc => Value::from_safe_string(body.toc.to_string()),
            main => Value::from_safe_string(body.main.to_string()),
            others => Value::from_safe_string(body.others.to_string()),
            failures => Value::from_safe_string(body.failures.to_string()),
        },
    )
}

/// One table of contents entry.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry<'a> {
    pub id: String,
    pub label: &'a str,
    pub path: String,
}

/// The entries of the table of contents, in order.
pub fn table_of_contents(entries: &[TocEntry<'_>]) -> Result<String, Error> {
    render("toc.html", context! { entries => entries })
}

/// Data of one workflow section.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSection<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub path: &'a str,
    pub annotation: &'a str,
    pub arguments: &'a [ArgumentRow<'a>],
    pub variables: &'a [VariableRow<'a>],
    pub invocations: &'a [Invocation<'a>],
}

/// One row of the arguments table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArgumentRow<'a> {
    pub name: &'a str,
    pub direction: &'a str,
    pub type_name: &'a str,
    pub annotation: &'a str,
}

/// One row of the variables table.
#[derive(Debug, Clone, Serialize)]
pub struct VariableRow<'a> {
    pub name: &'a str,
    pub type_name: String,
    pub default_value: String,
    pub annotation: &'a str,
}

/// One invoked workflow, linked when its section exists.
#[derive(Debug, Clone, Serialize)]
pub struct Invocation<'a> {
    pub path: &'a str,
    pub target_id: Option<String>,
}

/// A workflow's documentation block. The variables table and the list of
/// invoked workflows are left out when empty.
pub fn workflow_section(section: &WorkflowSection<'_>) -> Result<String, Error> {
    render("section.html", section)
}

/// A workflow left out of the report.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRow {
    pub path: String,
    pub message: String,
}

/// List of workflows that were left out of the report; empty when there
/// are none.
pub fn failure_section(failures: &[FailureRow]) -> Result<String, Error> {
    render("failures.html", context! { failures => failures })
}
