// Static page sources for fallback projects
//
// `{{TITLE}}` and `{{PROMPT}}` are substituted by the synthesizer.

pub const GENERIC_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <div id="root">
    <h1>{{TITLE}}</h1>
    <p>This is a basic project structure created from your prompt.</p>
    <p>Prompt: "{{PROMPT}}"</p>
  </div>
  <script src="main.js"></script>
</body>
</html>"#;

pub const GENERIC_STYLES_CSS: &str = r#"body {
  font-family: system-ui, -apple-system, 'Segoe UI', Roboto, 'Helvetica Neue', sans-serif;
  margin: 0;
  padding: 20px;
  line-height: 1.6;
  color: #333;
  background-color: #f9f9f9;
}

#root {
  max-width: 800px;
  margin: 0 auto;
  padding: 20px;
  background-color: white;
  border-radius: 8px;
  box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
}

h1 {
  color: #2563eb;
  margin-top: 0;
}

.clock {
  margin-top: 20px;
  padding: 10px;
  background-color: #f0f0f0;
  border-radius: 4px;
}
"#;

pub const GENERIC_MAIN_JS: &str = r#"// Entry point of the generated project
console.log('Project initialized');

document.addEventListener('DOMContentLoaded', () => {
  const clock = document.createElement('div');
  clock.className = 'clock';

  const render = () => {
    clock.textContent = 'Current time: ' + new Date().toLocaleTimeString();
  };

  render();
  setInterval(render, 1000);

  document.getElementById('root').appendChild(clock);
});
"#;

pub const UNAVAILABLE_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>API Quota Exceeded</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <div id="root">
    <div class="quota-error">
      <h1>API Quota Exceeded</h1>
      <p>Your project could not be generated because the model API quota has been used up or no model is currently available.</p>
      <div class="info-box">
        <h2>Your Prompt</h2>
        <p>"{{PROMPT}}"</p>
      </div>
      <div class="info-box">
        <h2>What you can do</h2>
        <ul>
          <li>Try again later, once the quota resets</li>
          <li>Use a different API key with a higher quota</li>
          <li>Try a simpler prompt that needs fewer tokens</li>
        </ul>
      </div>
    </div>
  </div>
  <script src="main.js"></script>
</body>
</html>"#;

pub const UNAVAILABLE_STYLES_CSS: &str = r#"body {
  font-family: system-ui, -apple-system, 'Segoe UI', Roboto, 'Helvetica Neue', sans-serif;
  margin: 0;
  padding: 20px;
  line-height: 1.6;
  color: #333;
  background-color: #f9f9f9;
}

#root {
  max-width: 800px;
  margin: 0 auto;
  padding: 20px;
}

.quota-error {
  background-color: white;
  border-radius: 8px;
  box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
  padding: 30px;
  border-top: 5px solid #e11d48;
}

h1 {
  color: #e11d48;
  margin-top: 0;
}

.info-box {
  background-color: #f8f9fa;
  border-radius: 6px;
  padding: 15px;
  margin: 20px 0;
  border-left: 3px solid #2563eb;
}

.info-box h2 {
  margin-top: 0;
  font-size: 1.2rem;
  color: #2563eb;
}

.retry-button {
  background-color: #2563eb;
  color: white;
  border: none;
  padding: 10px 20px;
  border-radius: 4px;
  margin-top: 20px;
  cursor: pointer;
}

.reset-hint {
  margin-top: 20px;
  font-size: 0.9rem;
  color: #666;
}
"#;

pub const UNAVAILABLE_MAIN_JS: &str = r#"// Service unavailable page behaviour
console.log('Quota exceeded handler initialized');

document.addEventListener('DOMContentLoaded', () => {
  const root = document.getElementById('root');

  const retry = document.createElement('button');
  retry.textContent = 'Try Again';
  retry.className = 'retry-button';
  retry.addEventListener('click', () => window.location.reload());
  root.appendChild(retry);

  // Quotas are assumed to reset on the hour
  const reset = new Date();
  reset.setHours(reset.getHours() + 1, 0, 0, 0);

  const hint = document.createElement('div');
  hint.className = 'reset-hint';
  hint.textContent = 'Quota might reset around: ' + reset.toLocaleTimeString();
  root.appendChild(hint);
});
"#;
