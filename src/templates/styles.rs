//! CSS styles for the page.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --red: #dc322f;
    --blue: #268bd2;
    --cyan: #2aa198;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --code-bg: var(--base2);
    --error: var(--red);
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

/* Georgian script needs a font that carries Mkhedruli */
[lang="ka"] { font-family: "Noto Sans Georgian", "BPG Glaho", sans-serif; }

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-top: 1.5em; margin-bottom: 0.5em; }
h1 { font-size: 1.5rem; }

.search-bar {
    display: flex;
    gap: 0.5rem;
    margin-top: 1rem;
}

.search-bar input {
    flex: 1;
    padding: 0.5rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-size: 1rem;
}

.icon-btn, .output-card button, #exportBtn {
    padding: 0.4rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--accent);
    color: var(--fg);
    cursor: pointer;
    font-size: 0.9rem;
}

.output-card {
    margin-top: 1rem;
    padding: 1rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    min-height: 3rem;
}
.output-card h3 { margin-top: 0; }
.output-card .answer { margin-bottom: 0.75rem; }
.output-card .answer pre {
    background: var(--code-bg);
    padding: 0.5rem;
    overflow-x: auto;
}
.output-card .error { color: var(--error); }
.output-card .muted { color: var(--muted); }

.notes-header {
    display: flex;
    justify-content: space-between;
    align-items: baseline;
}

.note-list { list-style: none; }

.note-item {
    padding: 0.75rem 0;
    border-bottom: 1px solid var(--border);
    display: flex;
    justify-content: space-between;
    align-items: baseline;
    gap: 1rem;
}
.note-item:last-child { border-bottom: none; }
.note-item form { display: inline; }

.remove-btn {
    background: none;
    border: none;
    cursor: pointer;
}

.empty { color: var(--muted); font-style: italic; }
"#;
