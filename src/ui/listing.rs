use num_format::{Locale, ToFormattedString};
use std::fmt::Write;

use crate::sources::{ChannelRecord, VideoRecord};

/// Contador decimal con separador de miles; si no es un número se deja tal cual
pub fn format_count(raw: &str) -> String {
    match raw.trim().parse::<u64>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => raw.to_string(),
    }
}

fn count_or_dash(raw: Option<&str>) -> String {
    raw.map(format_count).unwrap_or_else(|| "-".to_string())
}

/// Una línea por vídeo: fecha, duración, vistas, título y enlace
pub fn format_video_line(video: &VideoRecord) -> String {
    let views = video
        .statistics()
        .and_then(|stats| stats.view_count.as_deref());

    format!(
        "{}  {:>8}  {:>10} views  {}{}\n            {}",
        video.published_at().format("%Y-%m-%d"),
        video.duration().unwrap_or("--:--"),
        count_or_dash(views),
        if video.is_short() { "🎬 " } else { "" },
        video.title(),
        video.watch_url()
    )
}

pub fn format_video_list(title: &str, videos: &[VideoRecord]) -> String {
    let mut out = format!("{} ({})\n", title, videos.len());

    if videos.is_empty() {
        // vacío puede ser "sin datos": no decir "no hay contenido"
        out.push_str("  Unavailable right now, try again later\n");
        return out;
    }

    for video in videos {
        let _ = writeln!(out, "  {}", format_video_line(video));
    }
    out
}

pub fn format_channel(channel: &ChannelRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📺 {}", channel.title);
    if let Some(handle) = &channel.handle {
        let _ = writeln!(out, "   {}", handle);
    }
    let _ = writeln!(out, "   {}", channel.url());
    let _ = writeln!(
        out,
        "   Subscribers: {}  Videos: {}  Views: {}",
        count_or_dash(channel.statistics.subscriber_count.as_deref()),
        count_or_dash(channel.statistics.video_count.as_deref()),
        count_or_dash(channel.statistics.view_count.as_deref()),
    );
    if !channel.description.is_empty() {
        let _ = writeln!(out, "\n{}", channel.description);
    }
    out
}
