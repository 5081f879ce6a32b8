use crate::models::{Difficulty, Problem, Record, StatsResponse, ViewMode};
use crate::state::Dashboard;

pub fn render_index(dashboard: &Dashboard, stats: &StatsResponse) -> String {
    let draft = dashboard.draft.record();
    let solved = |difficulty| count(draft, difficulty, |p| p.solved);
    let total = |difficulty| count(draft, difficulty, |p| p.total);
    let stats_json = serde_json::to_string(stats).unwrap_or_else(|_| "null".to_string());

    INDEX_HTML
        .replace("{{VIEW}}", dashboard.view.as_str())
        .replace("{{STATS_HIDDEN}}", hidden_unless(dashboard.view, ViewMode::Stats))
        .replace("{{FORM_HIDDEN}}", hidden_unless(dashboard.view, ViewMode::Form))
        .replace("{{STATS_ACTIVE}}", active_if(dashboard.view, ViewMode::Stats))
        .replace("{{FORM_ACTIVE}}", active_if(dashboard.view, ViewMode::Form))
        .replace("{{RECORD_COUNT}}", &dashboard.records.len().to_string())
        .replace("{{RANK}}", &escape_html(&draft.rank))
        .replace("{{DATE}}", &escape_html(&draft.date))
        .replace("{{EASY_SOLVED}}", &solved(Difficulty::Easy))
        .replace("{{EASY_TOTAL}}", &total(Difficulty::Easy))
        .replace("{{MEDIUM_SOLVED}}", &solved(Difficulty::Medium))
        .replace("{{MEDIUM_TOTAL}}", &total(Difficulty::Medium))
        .replace("{{HARD_SOLVED}}", &solved(Difficulty::Hard))
        .replace("{{HARD_TOTAL}}", &total(Difficulty::Hard))
        .replace("{{STATS_JSON}}", &script_safe(&stats_json))
}

fn count(draft: &Record, difficulty: Difficulty, pick: fn(&Problem) -> u64) -> String {
    draft
        .problems
        .iter()
        .find(|problem| problem.difficulty == difficulty)
        .map(pick)
        .unwrap_or_default()
        .to_string()
}

fn hidden_unless(current: ViewMode, view: ViewMode) -> &'static str {
    if current == view { "" } else { "hidden" }
}

fn active_if(current: ViewMode, view: ViewMode) -> &'static str {
    if current == view { "active" } else { "" }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// Keeps user text inside the inline script from closing the tag.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Practice Dashboard</title>
  <style>
    :root {
      --bg: #0f1115;
      --panel: #181b22;
      --ink: #e7e9ee;
      --muted: #8a90a0;
      --accent: #8884d8;
      --solved: #4ade80;
      --remaining: #f87171;
      --line: rgba(231, 233, 238, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1000px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .tabs {
      display: flex;
      gap: 8px;
    }

    .tab {
      appearance: none;
      border: none;
      border-radius: 8px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: #111318;
      color: var(--ink);
    }

    .tab.active {
      background: #3b82f6;
      color: white;
    }

    .card {
      background: var(--panel);
      border-radius: 14px;
      padding: 18px;
      border: 1px solid var(--line);
    }

    #rank-chart {
      width: 100%;
      height: 400px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 2.5;
    }

    .chart-point {
      fill: var(--panel);
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: var(--line);
      stroke-dasharray: 3 3;
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .pies {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(250px, 1fr));
      gap: 16px;
    }

    .pies h3 {
      margin: 0 0 8px;
      text-transform: capitalize;
    }

    .pie {
      width: 100%;
      height: 220px;
      display: block;
    }

    .slice-solved {
      fill: var(--solved);
    }

    .slice-remaining {
      fill: var(--remaining);
    }

    .legend {
      display: flex;
      gap: 14px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    form {
      display: grid;
      gap: 14px;
      max-width: 520px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
      color: var(--muted);
      text-transform: capitalize;
    }

    input {
      background: #0b0d11;
      color: var(--ink);
      border: 1px solid var(--line);
      border-radius: 8px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    input.invalid {
      border-color: var(--remaining);
    }

    .pair {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 12px;
    }

    .submit {
      appearance: none;
      border: none;
      border-radius: 8px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: #22c55e;
      color: #05140a;
    }

    .link-button {
      appearance: none;
      border: 1px solid var(--line);
      background: transparent;
      color: var(--muted);
      border-radius: 8px;
      padding: 6px 12px;
      cursor: pointer;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: var(--remaining);
    }

    .status[data-type="ok"] {
      color: var(--solved);
    }

    [hidden] {
      display: none !important;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Practice Dashboard</h1>
      <p class="subtitle">Rank history and solved problems, <span id="record-count">{{RECORD_COUNT}}</span> snapshots stored.</p>
    </header>

    <nav class="tabs" role="tablist">
      <form method="post" action="/view/stats">
        <button class="tab {{STATS_ACTIVE}}" type="submit" data-view="stats" role="tab">Stats</button>
      </form>
      <form method="post" action="/view/form">
        <button class="tab {{FORM_ACTIVE}}" type="submit" data-view="form" role="tab">Form</button>
      </form>
    </nav>

    <section id="stats-view" {{STATS_HIDDEN}}>
      <div class="card">
        <div class="legend">
          <span>Rank over time (lower is better)</span>
          <button class="link-button" id="refresh-btn" type="button">Reload</button>
        </div>
        <svg id="rank-chart" viewBox="0 0 800 400" aria-label="Rank chart" role="img"></svg>
      </div>
      <div class="pies" id="pies"></div>
    </section>

    <section id="form-view" {{FORM_HIDDEN}}>
      <form id="draft-form" class="card" method="post" action="/submit">
        <label>Rank
          <input type="text" name="rank" data-field="rank" value="{{RANK}}" />
        </label>
        <label>Date
          <input type="text" name="date" data-field="date" value="{{DATE}}" />
        </label>
        <div class="pair">
          <label>easy - Solved
            <input type="number" min="0" step="1" name="easy_solved" data-field="solved" data-difficulty="easy" value="{{EASY_SOLVED}}" />
          </label>
          <label>easy - Total
            <input type="number" min="0" step="1" name="easy_total" data-field="total" data-difficulty="easy" value="{{EASY_TOTAL}}" />
          </label>
        </div>
        <div class="pair">
          <label>medium - Solved
            <input type="number" min="0" step="1" name="medium_solved" data-field="solved" data-difficulty="medium" value="{{MEDIUM_SOLVED}}" />
          </label>
          <label>medium - Total
            <input type="number" min="0" step="1" name="medium_total" data-field="total" data-difficulty="medium" value="{{MEDIUM_TOTAL}}" />
          </label>
        </div>
        <div class="pair">
          <label>hard - Solved
            <input type="number" min="0" step="1" name="hard_solved" data-field="solved" data-difficulty="hard" value="{{HARD_SOLVED}}" />
          </label>
          <label>hard - Total
            <input type="number" min="0" step="1" name="hard_total" data-field="total" data-difficulty="hard" value="{{HARD_TOTAL}}" />
          </label>
        </div>
        <button class="submit" type="submit">Submit</button>
      </form>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const rankChartEl = document.getElementById('rank-chart');
    const piesEl = document.getElementById('pies');
    const statusEl = document.getElementById('status');
    const recordCountEl = document.getElementById('record-count');
    const draftForm = document.getElementById('draft-form');
    const views = {
      stats: document.getElementById('stats-view'),
      form: document.getElementById('form-view')
    };
    const tabs = Array.from(document.querySelectorAll('.tab'));

    let statsData = {{STATS_JSON}};
    let activeView = '{{VIEW}}';

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeText = (value) =>
      String(value).replace(/[&<>"']/g, (ch) => `&#${ch.charCodeAt(0)};`);

    const renderRankChart = (points) => {
      const ranked = points
        .map((point, index) => ({ ...point, index }))
        .filter((point) => typeof point.rank === 'number');
      if (!ranked.length) {
        rankChartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 800;
      const height = 400;
      const paddingX = 56;
      const paddingY = 36;
      const top = 20;

      const values = ranked.map((point) => point.rank);
      let min = Math.min(...values);
      let max = Math.max(...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => (points.length > 1 ? paddingX + index * xStep : width / 2);
      // Lower rank is better, so smaller values sit higher on the chart.
      const y = (value) => top + (value - min) * scaleY;

      const path = ranked
        .map((point, i) => `${i === 0 ? 'M' : 'L'} ${x(point.index).toFixed(2)} ${y(point.rank).toFixed(2)}`)
        .join(' ');

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(points.length / 10));
      const xLabels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 20}" text-anchor="middle">${escapeText(point.label)}</text>`;
        })
        .join('');

      const circles = ranked
        .map((point) => `<circle class="chart-point" cx="${x(point.index)}" cy="${y(point.rank)}" r="4"><title>${escapeText(point.label)}: ${point.rank}</title></circle>`)
        .join('');

      rankChartEl.innerHTML = `${grid}<path class="chart-line" d="${path}" />${circles}${xLabels}`;
    };

    const arcPath = (cx, cy, r, start, end) => {
      if (end - start >= Math.PI * 2 - 1e-9) {
        return `M ${cx - r} ${cy} A ${r} ${r} 0 1 1 ${cx + r} ${cy} A ${r} ${r} 0 1 1 ${cx - r} ${cy} Z`;
      }
      const sx = cx + r * Math.cos(start);
      const sy = cy + r * Math.sin(start);
      const ex = cx + r * Math.cos(end);
      const ey = cy + r * Math.sin(end);
      const large = end - start > Math.PI ? 1 : 0;
      return `M ${cx} ${cy} L ${sx} ${sy} A ${r} ${r} 0 ${large} 1 ${ex} ${ey} Z`;
    };

    const renderPie = (entry) => {
      const [solved, remaining] = entry.slices;
      const total = solved.value + remaining.value;
      const cx = 150;
      const cy = 110;
      const r = 80;
      let body = '';
      if (total === 0) {
        body = `<circle cx="${cx}" cy="${cy}" r="${r}" fill="none" stroke="currentColor" stroke-opacity="0.2" />`;
      } else {
        let start = -Math.PI / 2;
        [[solved, 'slice-solved'], [remaining, 'slice-remaining']].forEach(([slice, cls]) => {
          if (slice.value === 0) {
            return;
          }
          const end = start + (slice.value / total) * Math.PI * 2;
          body += `<path class="${cls}" d="${arcPath(cx, cy, r, start, end)}"><title>${slice.name}: ${slice.value}</title></path>`;
          start = end;
        });
      }
      return `
        <div class="card">
          <h3>${escapeText(entry.difficulty)}</h3>
          <svg class="pie" viewBox="0 0 300 220" role="img">${body}</svg>
          <div class="legend">
            <span>Solved: ${solved.value}</span>
            <span>Remaining: ${remaining.value}</span>
          </div>
        </div>`;
    };

    const renderStats = () => {
      if (!statsData) {
        return;
      }
      renderRankChart(statsData.rank_series);
      piesEl.innerHTML = statsData.breakdown.map(renderPie).join('');
      piesEl.hidden = statsData.breakdown.length === 0;
      recordCountEl.textContent = statsData.rank_series.length;
    };

    const showView = (view) => {
      activeView = view;
      Object.entries(views).forEach(([name, el]) => {
        el.hidden = name !== view;
      });
      tabs.forEach((button) => {
        button.classList.toggle('active', button.dataset.view === view);
      });
    };

    const postJson = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats');
      if (!res.ok) {
        throw new Error('Unable to load stats');
      }
      statsData = await res.json();
      renderStats();
    };

    const fillDraft = (draft) => {
      draftForm.elements.rank.value = draft.rank;
      draftForm.elements.date.value = draft.date;
      draft.problems.forEach((problem) => {
        const solved = draftForm.elements[`${problem.difficulty}_solved`];
        const total = draftForm.elements[`${problem.difficulty}_total`];
        if (solved) solved.value = problem.solved;
        if (total) total.value = problem.total;
      });
      Array.from(draftForm.querySelectorAll('input')).forEach((input) => input.classList.remove('invalid'));
    };

    tabs.forEach((button) => {
      button.addEventListener('click', (event) => {
        event.preventDefault();
        const view = button.dataset.view;
        showView(view);
        postJson('/api/view', { view }).catch((err) => setStatus(err.message, 'error'));
      });
    });

    const draftInputs = Array.from(draftForm.querySelectorAll('input'));

    const editFor = (input) => {
      const edit = { field: input.dataset.field, value: input.value };
      if (input.dataset.difficulty) {
        edit.difficulty = input.dataset.difficulty;
      }
      return edit;
    };

    // Field edits run one after another; submit waits for the tail.
    let pendingEdits = Promise.resolve();

    draftInputs.forEach((input) => {
      input.addEventListener('change', () => {
        const edit = editFor(input);
        pendingEdits = pendingEdits
          .then(() => postJson('/api/draft', edit))
          .then(() => {
            input.classList.remove('invalid');
            setStatus('', '');
          })
          .catch((err) => {
            input.classList.add('invalid');
            setStatus(err.message, 'error');
          });
      });
    });

    draftForm.addEventListener('submit', (event) => {
      event.preventDefault();
      setStatus('Submitting...', 'info');
      const edits = draftInputs.map(editFor);
      pendingEdits
        .then(() => postJson('/api/submit', { edits }))
        .then(async () => {
          setStatus('', '');
          alert('Submitted successfully!');
          await loadStats();
          const res = await fetch('/api/draft');
          if (res.ok) {
            fillDraft(await res.json());
          }
        })
        .catch((err) => setStatus(`Submit failed: ${err.message}`, 'error'));
    });

    document.getElementById('refresh-btn').addEventListener('click', () => {
      postJson('/api/refresh')
        .then(() => loadStats())
        .then(() => setStatus('Reloaded', 'ok'))
        .catch((err) => setStatus(`Reload failed: ${err.message}`, 'error'));
    });

    showView(activeView);
    renderStats();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_stats;

    fn dashboard_with(records: Vec<Record>) -> Dashboard {
        Dashboard::new(records)
    }

    #[test]
    fn renders_active_view_and_draft_values() {
        let mut dashboard = dashboard_with(Vec::new());
        dashboard.view = ViewMode::Form;
        dashboard.draft.set_rank("480");
        dashboard.draft.set_solved(Difficulty::Medium, "5").unwrap();
        let stats = build_stats(&dashboard.records);

        let html = render_index(&dashboard, &stats);
        assert!(html.contains("let activeView = 'form';"));
        assert!(html.contains(r#"<section id="stats-view" hidden>"#));
        assert!(html.contains(r#"<section id="form-view" >"#));
        assert!(html.contains(r#"name="rank" data-field="rank" value="480""#));
        assert!(html.contains(r#"data-difficulty="medium" value="5""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn scripted_submit_sends_fields_after_pending_edits() {
        let dashboard = dashboard_with(Vec::new());
        let stats = build_stats(&dashboard.records);

        let html = render_index(&dashboard, &stats);
        assert!(html.contains(".then(() => postJson('/api/submit', { edits }))"));
        assert!(html.contains("pendingEdits = pendingEdits"));
    }

    #[test]
    fn embeds_projections_as_json() {
        let records = vec![Record {
            id: 0,
            date: "1700000000000".into(),
            rank: "500".into(),
            problems: vec![Problem {
                difficulty: Difficulty::Easy,
                solved: 10,
                total: 50,
            }],
        }];
        let dashboard = dashboard_with(records);
        let stats = build_stats(&dashboard.records);

        let html = render_index(&dashboard, &stats);
        assert!(html.contains(r#""rank":500.0"#));
        assert!(html.contains(r#"{"name":"Remaining","value":40}"#));
        assert!(html.contains(r#"<span id="record-count">1</span>"#));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut dashboard = dashboard_with(Vec::new());
        dashboard.draft.set_rank(r#""><script>alert(1)</script>"#);
        let stats = build_stats(&dashboard.records);

        let html = render_index(&dashboard, &stats);
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert_eq!(script_safe(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }
}
