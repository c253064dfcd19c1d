//! Built-in HTML report template with `{{PLACEHOLDER}}` substitution.

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <style>
        body { font-family: Arial, sans-serif; }
        .meta { color: #666; }
        .stock-item { margin-bottom: 20px; }
        .stock-item img { max-width: 300px; height: auto; cursor: pointer; }
        .stock-item img:hover { opacity: 0.8; }
    </style>
    <script>
        function openGraph(dataUrl) {
            var win = window.open();
            win.document.write('<iframe src="' + dataUrl + '" frameborder="0" style="border:0; width:100%; height:100%;" allowfullscreen></iframe>');
        }
    </script>
</head>
<body>
    <h1>{{TITLE}}</h1>
    <p class="meta">Generated {{GENERATED_AT}} &middot; {{ENTRY_COUNT}} stocks in an uptrend</p>
    <div class="stock-list">
{{STOCK_ITEMS}}
    </div>
</body>
</html>
"#;

pub fn template() -> &'static str {
    TEMPLATE
}
