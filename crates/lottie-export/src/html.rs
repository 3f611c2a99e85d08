//! Standalone HTML preview pages using lottie-web.

use std::io::Write;

use lottie_core::LottieResult;
use lottie_model::Animation;
use tracing::info;

use crate::lottie::export_lottie;

pub const LOTTIE_WEB_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/bodymovin/5.5.3/lottie.js";

fn html_begin<W: Write>(animation: &Animation, writer: &mut W) -> LottieResult<()> {
    let width = animation.width.unwrap_or(512);
    let height = animation.height.unwrap_or(512);
    write!(
        writer,
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <style>
        html, body {{ width: 100%; height: 100%; margin: 0; }}
        body {{ display: flex; }}
        #bodymovin {{ width: {width}px; height: {height}px; margin: auto;
            background-color: white;
            background-size: 64px 64px;
            background-image:
                linear-gradient(to right, rgba(0, 0, 0, .3) 50%, transparent 50%),
                linear-gradient(to bottom, rgba(0, 0, 0, .3) 50%, transparent 50%),
                linear-gradient(to bottom, white 50%, transparent 50%),
                linear-gradient(to right, transparent 50%, rgba(0, 0, 0, .5) 50%);
        }}
    </style>
    <script src="{LOTTIE_WEB_URL}"></script>
</head>
<body>
<div id="bodymovin"></div>
<script>
    var animData = {{
        container: document.getElementById('bodymovin'),
        renderer: 'svg',
        loop: true,
        autoplay: true,
        "#
    )?;
    Ok(())
}

fn html_end<W: Write>(writer: &mut W) -> LottieResult<()> {
    writer.write_all(
        b"
    };
    var anim = bodymovin.loadAnimation(animData);
</script>
</body>
</html>
",
    )?;
    Ok(())
}

/// A page playing the animation, with the JSON inlined.
pub fn export_embedded_html<W: Write>(animation: &Animation, mut writer: W) -> LottieResult<()> {
    html_begin(animation, &mut writer)?;
    writer.write_all(b"animationData: ")?;
    export_lottie(animation, &mut writer, true)?;
    html_end(&mut writer)?;
    info!("exported embedded html");
    Ok(())
}

/// A page playing the Lottie file at `path`.
pub fn export_linked_html<W: Write>(animation: &Animation, mut writer: W, path: &str) -> LottieResult<()> {
    html_begin(animation, &mut writer)?;
    write!(writer, "path: {}", serde_json::to_string(path)?)?;
    html_end(&mut writer)
}
