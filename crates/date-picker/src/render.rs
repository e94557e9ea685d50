use std::fmt::Write as _;
use std::io::Write as _;

use chrono::{Locale, NaiveDate};
use shared::animation::DisplayReceiver;
use shared::calendar::format_long_date;
use shared::categories::{CategorySet, EventCategory};
use shared::recommendation::RecommendationSource;
use shared::session::{SessionError, SessionState};

use crate::cli::CommandError;

const ROLLING_WIDTH: usize = 48;

pub fn banner(year: i32, recommender_configured: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "💖 Düğün Tarihi Bulucu 💖");
    let _ = writeln!(out, "Yapay zeka destekli, tarihi anlamlı düğün tarihi seçimi");
    let _ = writeln!(out);
    let _ = writeln!(out, "Özel gününüz için mükemmel tarihi bulmaya hazır mısınız?");
    let _ = writeln!(out, "Arama yılı: {year} ({})", year_span(year));
    if !recommender_configured {
        let _ = writeln!(
            out,
            "⚠️ Groq API anahtarı bulunamadı; tarihler tarihi olay olmadan seçilecek."
        );
    }
    let _ = write!(out, "Komutlar için 'yardım' yazın.");
    out
}

pub fn help() -> String {
    [
        "Komutlar:",
        "  tarih              Evlenmek için tarih al",
        "  onayla             Seçilen tarihi onayla",
        "  unut               Seçtiğim tarihleri unut",
        "  kategori <ad>      Olay kategorisini aç/kapat (ör. 'kategori spor')",
        "  kategoriler        Olay kategorilerini listele",
        "  yıl <yıl>          Tarih aranacak yılı seç",
        "  durum              Mevcut seçimi göster",
        "  yardım             Bu yardım metnini göster",
        "  çıkış              Programdan çık",
    ]
    .join("\n")
}

pub fn prompt() {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}

/// Prints the rolling date in place until the display channel closes.
pub async fn rolling_display(mut display: DisplayReceiver) {
    while display.changed().await.is_ok() {
        let current = *display.borrow_and_update();
        if let Some(date) = current {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(
                stdout,
                "\r🎲 {:<width$}",
                format_long_date(date),
                width = ROLLING_WIDTH
            );
            let _ = stdout.flush();
        }
    }
}

pub fn selection(state: &SessionState, source: &RecommendationSource) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\r{:<width$}", "", width = ROLLING_WIDTH + 3);

    let Some(date) = state.selected_date() else {
        return out;
    };
    let _ = writeln!(out, "📅 {}", format_long_date(date));

    if let Some(anecdote) = state.anecdote() {
        let _ = writeln!(out, "📜 Bu Tarihte Yaşanan Tarihi Olay:");
        let _ = writeln!(out, "   {}", anecdote.description());
        let _ = write!(out, "   ({})", anecdote.year());
        if let Some(category) = anecdote.category() {
            let _ = write!(out, " [{category}]");
        }
        let _ = writeln!(out);
    }

    if let RecommendationSource::Fallback { .. } = source {
        let _ = writeln!(out, "ℹ️ Tarihi olay alınamadı, tarih rastgele seçildi.");
    }

    let _ = write!(
        out,
        "'onayla' ile onaylayabilir ya da 'tarih' ile yeni bir tarih alabilirsiniz. ({} tarih kullanıldı)",
        state.used_dates().len()
    );
    out
}

pub fn finalized(state: &SessionState) -> String {
    let mut out = String::from("🎉 Tarihiniz Onaylandı!");
    if let Some(date) = state.selected_date() {
        let _ = write!(out, "\nEvlenmek için seçtiğiniz tarih: {}", format_long_date(date));
    }
    if let Some(anecdote) = state.anecdote() {
        let _ = write!(out, "\n\"{}\" ({})", anecdote.description(), anecdote.year());
    }
    out
}

pub fn nothing_to_finalize() -> String {
    "Önce 'tarih' ile bir tarih alın.".to_string()
}

pub fn history_forgotten() -> String {
    "🔄 Seçtiğiniz tarihler unutuldu.".to_string()
}

pub fn session_error(err: &SessionError) -> String {
    match err {
        SessionError::NoCategories => "Lütfen en az bir olay kategorisi seçin!".to_string(),
        SessionError::NoDatesRemain { .. } => {
            "Tüm tarihler kullanıldı! Lütfen \"Seçtiğim tarihleri unut\" komutunu ('unut') çalıştırın."
                .to_string()
        }
        SessionError::YearOutOfRange { first, last, .. } => {
            format!("Lütfen {first} ile {last} arasında bir yıl seçin.")
        }
    }
}

pub fn command_error(err: &CommandError) -> String {
    match err {
        CommandError::Unknown(name) => {
            format!("Bilinmeyen komut: {name}. Komutlar için 'yardım' yazın.")
        }
        CommandError::MissingArgument(name) => format!("'{name}' komutu bir değer bekliyor."),
        CommandError::InvalidYear(value) => format!("Geçersiz yıl: {value}"),
    }
}

pub fn categories(selected: &CategorySet) -> String {
    let mut out = format!(
        "🎯 Olay Kategorileri {}/{}",
        selected.len(),
        EventCategory::ALL.len()
    );
    for category in EventCategory::ALL {
        let mark = if selected.contains(category.label()) {
            "x"
        } else {
            " "
        };
        let _ = write!(
            out,
            "\n  [{mark}] {} {} ({})",
            category.icon(),
            category.label(),
            category.id()
        );
    }
    if selected.is_empty() {
        let _ = write!(out, "\n⚠️ En az bir kategori seçmelisiniz");
    }
    out
}

pub fn unknown_category(query: &str) -> String {
    format!("Bilinmeyen kategori: {query}. Liste için 'kategoriler' yazın.")
}

pub fn category_toggled(category: EventCategory, enabled: bool, selected: &CategorySet) -> String {
    let state = if enabled { "açıldı" } else { "kapatıldı" };
    format!(
        "{} {} {state} ({}/{})",
        category.icon(),
        category.label(),
        selected.len(),
        EventCategory::ALL.len()
    )
}

pub fn year_selected(year: i32, available: usize) -> String {
    format!("Arama yılı: {year} ({}), {available} uygun hafta sonu tarihi", year_span(year))
}

pub fn status(state: &SessionState, available: usize) -> String {
    let mut out = format!(
        "Yıl: {}, kategoriler: {}/{}, kalan tarih: {available}, kullanılan: {}",
        state.year(),
        state.categories().len(),
        EventCategory::ALL.len(),
        state.used_dates().len()
    );
    match state.selected_date() {
        Some(date) => {
            let marker = if state.is_finalized() {
                " ✅ onaylandı"
            } else {
                ""
            };
            let _ = write!(out, "\nSeçilen tarih: {}{marker}", format_long_date(date));
        }
        None => {
            let _ = write!(out, "\nHenüz tarih seçilmedi.");
        }
    }
    out
}

/// "1 Ocak 2027 - 31 Aralık 2027 arası".
fn year_span(year: i32) -> String {
    let bounds = NaiveDate::from_ymd_opt(year, 1, 1).zip(NaiveDate::from_ymd_opt(year, 12, 31));
    match bounds {
        Some((first, last)) => format!(
            "{} - {} arası",
            first.format_localized("%-d %B %Y", Locale::tr_TR),
            last.format_localized("%-d %B %Y", Locale::tr_TR)
        ),
        None => year.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shared::categories::{CategorySet, EventCategory};
    use shared::session::{SessionError, SessionState};

    use super::{categories, category_toggled, session_error, status, year_span};

    #[test]
    fn validation_errors_use_user_facing_messages() {
        assert_eq!(
            session_error(&SessionError::NoCategories),
            "Lütfen en az bir olay kategorisi seçin!"
        );
        assert!(
            session_error(&SessionError::NoDatesRemain { year: 2027 })
                .starts_with("Tüm tarihler kullanıldı!")
        );
        assert_eq!(
            session_error(&SessionError::YearOutOfRange {
                year: 2050,
                first: 2026,
                last: 2046,
            }),
            "Lütfen 2026 ile 2046 arasında bir yıl seçin."
        );
    }

    #[test]
    fn year_span_uses_turkish_month_names() {
        assert_eq!(year_span(2027), "1 Ocak 2027 - 31 Aralık 2027 arası");
    }

    #[test]
    fn category_list_marks_enabled_entries() {
        let mut selected = CategorySet::default();
        selected.toggle("Spor");

        let rendered = categories(&selected);

        assert!(rendered.starts_with("🎯 Olay Kategorileri 6/7"));
        assert!(rendered.contains("[ ] ⚽ Spor (sports)"));
        assert!(rendered.contains("[x] 🔬 Bilim ve Teknoloji (science)"));
        assert!(!rendered.contains("En az bir kategori"));
    }

    #[test]
    fn empty_category_list_shows_warning() {
        let rendered = categories(&CategorySet::empty());
        assert!(rendered.contains("⚠️ En az bir kategori seçmelisiniz"));
    }

    #[test]
    fn toggle_message_reports_direction_and_count() {
        let mut selected = CategorySet::default();
        selected.toggle("Spor");
        assert_eq!(
            category_toggled(EventCategory::Sports, false, &selected),
            "⚽ Spor kapatıldı (6/7)"
        );
    }

    #[test]
    fn status_without_selection() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        let state = SessionState::new(today);

        assert_eq!(
            status(&state, 104),
            "Yıl: 2027, kategoriler: 7/7, kalan tarih: 104, kullanılan: 0\nHenüz tarih seçilmedi."
        );
    }
}
