// Redesign a room photo from the command line
use std::fs;
use std::path::PathBuf;

use dreamspace_core::{AspectRatio, DesignStyle, EncodedImage, SessionController};
use gemini_designer::GeminiDesigner;

const USAGE: &str = "Usage: redesign <IMAGE_PATH> [--style STYLE] [--ideas TEXT] [--aspect RATIO] [--out PATH]\n\
Styles: Modern, Minimalist, Rustic, Luxury, Bohemian, Industrial, Coastal, Scandinavian\n\
Aspect ratios: 1:1, 16:9, 9:16, 4:3, 3:4";

struct Args {
    image_path: PathBuf,
    style: DesignStyle,
    ideas: String,
    aspect_ratio: AspectRatio,
    out: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut image_path = None;
    let mut style = DesignStyle::default();
    let mut ideas = String::new();
    let mut aspect_ratio = AspectRatio::default();
    let mut out = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("{} needs a value\n\n{}", flag, USAGE))
        };
        match arg.as_str() {
            "--style" => style = value("--style")?.parse().map_err(anyhow::Error::msg)?,
            "--ideas" => ideas = value("--ideas")?,
            "--aspect" => aspect_ratio = value("--aspect")?.parse().map_err(anyhow::Error::msg)?,
            "--out" => out = Some(PathBuf::from(value("--out")?)),
            "-h" | "--help" => anyhow::bail!("{}", USAGE),
            flag if flag.starts_with("--") => anyhow::bail!("unknown option {}\n\n{}", flag, USAGE),
            path => image_path = Some(PathBuf::from(path)),
        }
    }

    Ok(Args {
        image_path: image_path.ok_or_else(|| anyhow::anyhow!("{}", USAGE))?,
        style,
        ideas,
        aspect_ratio,
        out,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    println!("🏠 DreamSpace AI Room Redesign");
    println!("==============================\n");
    println!("📂 Loading image: {}", args.image_path.display());

    let bytes = fs::read(&args.image_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.image_path.display(), e))?;
    let format = image::guess_format(&bytes)
        .map_err(|e| anyhow::anyhow!("{} is not a supported image: {}", args.image_path.display(), e))?;
    println!("✅ Loaded {} bytes ({:?})\n", bytes.len(), format);

    let designer = GeminiDesigner::from_env()?;

    let mut session = SessionController::new();
    session.upload_image(EncodedImage::from_bytes(format.to_mime_type(), &bytes)?)?;
    session.select_style(args.style);
    session.set_custom_ideas(args.ideas);
    session.select_aspect_ratio(args.aspect_ratio);

    println!("🎨 Generating {} design at {}...", args.style, args.aspect_ratio);
    println!("(Three model calls; this may take a minute)\n");
    session.generate(&designer).await;

    if let Some(failure) = session.last_failure() {
        anyhow::bail!("❌ {} failed: {}", failure.stage, failure.message);
    }

    let (Some(design), Some(download)) = (session.transformation(), session.download()) else {
        anyhow::bail!("❌ Generation finished without a design");
    };

    println!("✅ Transformation complete!\n");
    println!("{}", "=".repeat(70));
    println!("🎨 Color palette: {}", design.color_palette);
    println!("🛋️  Core elements:");
    for item in &design.furniture_recommendations {
        println!("   - {}", item);
    }
    println!("💡 Lighting & ambiance: {}", design.lighting_plan);
    println!("\n\"{}\"", design.summary);
    println!("{}", "=".repeat(70));

    let output_path = args.out.unwrap_or_else(|| PathBuf::from(&download.filename));
    fs::write(&output_path, download.image.decode()?)?;
    println!("\n💾 Saved design to: {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_args(&args(&["room.jpg"])).unwrap();
        assert_eq!(parsed.image_path, PathBuf::from("room.jpg"));
        assert_eq!(parsed.style, DesignStyle::Modern);
        assert_eq!(parsed.aspect_ratio, AspectRatio::Square);
        assert!(parsed.ideas.is_empty());
        assert!(parsed.out.is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = parse_args(&args(&[
            "--style", "rustic", "room.png", "--ideas", "Stone fireplace", "--aspect", "4:3", "--out", "new.png",
        ]))
        .unwrap();
        assert_eq!(parsed.style, DesignStyle::Rustic);
        assert_eq!(parsed.ideas, "Stone fireplace");
        assert_eq!(parsed.aspect_ratio, AspectRatio::Standard);
        assert_eq!(parsed.out, Some(PathBuf::from("new.png")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["room.png", "--aspect", "2:1"])).is_err());
        assert!(parse_args(&args(&["room.png", "--style"])).is_err());
        assert!(parse_args(&args(&["room.png", "--colour", "red"])).is_err());
    }
}
