use crate::host::Environment;
use crate::models::{Category, SliceView};

pub fn render_index(view: &SliceView, environment: Environment, signal_ready: bool) -> String {
    let ready_script = if signal_ready { READY_SCRIPT } else { "" };

    INDEX_HTML
        .replace("{{ENV}}", &escape_html(&view.environment))
        .replace("{{TILES}}", &render_tiles(&view.tiles))
        .replace("{{STATUS}}", &escape_html(&view.status))
        .replace("{{COUNT}}", &escape_html(&view.count_label))
        .replace("{{HINT}}", &escape_html(&view.hint))
        .replace("{{BUTTONS}}", &render_buttons(environment))
        .replace("{{READY_SCRIPT}}", ready_script)
}

pub fn render_tiles(tiles: &[Option<Category>]) -> String {
    tiles
        .iter()
        .map(|tile| match tile {
            Some(category) if !category.tag().is_empty() => format!(
                r#"<div class="tile" data-type="{}"></div>"#,
                escape_html(category.tag())
            ),
            _ => r#"<div class="tile"></div>"#.to_string(),
        })
        .collect()
}

fn render_buttons(environment: Environment) -> String {
    Category::ALL
        .iter()
        .map(|category| {
            format!(
                r#"<form method="post" action="/slice/{tag}{suffix}"><button class="slice-btn" type="submit" data-type="{tag}">{label}</button></form>"#,
                tag = category.tag(),
                label = category.label(),
                suffix = environment.query_suffix(),
            )
        })
        .collect()
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const READY_SCRIPT: &str = r#"<script type="module">
    import { sdk } from 'https://esm.sh/@farcaster/miniapp-sdk';
    sdk.actions.ready().catch((err) => console.error('[Slice] ready() failed', err));
  </script>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Slice</title>
  <style>
    :root {
      --bg: #f6f1ea;
      --ink: #2b2a28;
      --muted: #7a746d;
      --card: #ffffff;
      --deep: #2f4858;
      --social: #ff6b4a;
      --rest: #7bb48f;
      --errands: #e0b84f;
      --unknown: #b9b2aa;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 24px 16px;
    }

    .app {
      width: min(420px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: 0 18px 48px rgba(47, 72, 88, 0.14);
      padding: 28px;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
    }

    h1 {
      margin: 0;
      font-size: 1.8rem;
    }

    .env {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .timeline {
      display: grid;
      grid-template-columns: repeat(8, 1fr);
      gap: 6px;
    }

    .tile {
      aspect-ratio: 1;
      border-radius: 8px;
      background: rgba(47, 72, 88, 0.08);
    }

    .tile[data-type] { background: var(--unknown); }
    .tile[data-type="deep"] { background: var(--deep); }
    .tile[data-type="social"] { background: var(--social); }
    .tile[data-type="rest"] { background: var(--rest); }
    .tile[data-type="errands"] { background: var(--errands); }

    .actions {
      display: grid;
      grid-template-columns: repeat(2, 1fr);
      gap: 10px;
    }

    .actions form {
      margin: 0;
    }

    .slice-btn {
      width: 100%;
      border: none;
      border-radius: 999px;
      padding: 14px 16px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      color: white;
    }

    .slice-btn[data-type="deep"] { background: var(--deep); }
    .slice-btn[data-type="social"] { background: var(--social); }
    .slice-btn[data-type="rest"] { background: var(--rest); }
    .slice-btn[data-type="errands"] { background: var(--errands); }

    .status {
      margin: 0;
      font-weight: 600;
    }

    .streak {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.95rem;
      min-height: 1.2em;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Slice</h1>
      <span id="env-label" class="env">{{ENV}}</span>
    </header>

    <section id="timeline" class="timeline">{{TILES}}</section>

    <section class="actions">{{BUTTONS}}</section>

    <p id="status" class="status">{{STATUS}}</p>
    <p id="streak-label" class="streak">{{COUNT}}</p>
    <p id="hint" class="hint">{{HINT}}</p>
  </main>

  <script>
    const timelineEl = document.getElementById('timeline');
    const statusEl = document.getElementById('status');
    const streakLabel = document.getElementById('streak-label');
    const hintEl = document.getElementById('hint');

    const renderTiles = (tiles) => {
      timelineEl.innerHTML = '';
      tiles.forEach((type) => {
        const tile = document.createElement('div');
        tile.className = 'tile';
        if (type) tile.dataset.type = type;
        timelineEl.appendChild(tile);
      });
    };

    const updateUI = (view) => {
      renderTiles(view.tiles);
      statusEl.textContent = view.status;
      streakLabel.textContent = view.count_label;
      hintEl.textContent = view.hint || '';
    };

    const choose = async (type) => {
      const res = await fetch('/api/slice', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ type })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      updateUI(await res.json());
    };

    document.querySelectorAll('.actions form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        const type = form.querySelector('.slice-btn').dataset.type;
        choose(type).catch((err) => console.warn('[Slice] failed to save slice', err));
      });
    });
  </script>
  {{READY_SCRIPT}}
</body>
</html>
"#;
