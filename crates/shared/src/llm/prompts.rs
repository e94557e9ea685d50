use chrono::NaiveDate;

use crate::calendar::format_long_date;
use crate::categories::CategorySet;

/// Builds the Turkish wedding-advisor instruction for one request.
///
/// Candidates are listed with zero-based indexes so the `selectedIndex`
/// the model returns can be used directly.
pub fn anecdote_prompt(categories: &CategorySet, candidates: &[NaiveDate]) -> String {
    let allowed = categories.labels().join(", ");
    let listed = candidates
        .iter()
        .enumerate()
        .map(|(index, date)| format!("{index}. {}", format_long_date(*date)))
        .collect::<Vec<_>>()
        .join("\n");
    let last_index = candidates.len().saturating_sub(1);

    format!(
        "Sen bir düğün tarihi danışmanısın. Aşağıdaki tarihlerden birini seç ve o tarihin \
gün-ay kombinasyonunda (yıl önemli değil) geçmişte yaşanmış mutlu, olumlu bir tarihi olayı bul. \
Tarihi olaylar gerçek olmalı.

İzin verilen olay kategorileri: {allowed}

SADECE bu kategorilerden birine ait olaylar seç. Eğer kullanıcı bir kategoriyi hariç tuttuysa, \
o kategoriden olay seçme.

Mevcut tarihler:
{listed}

SADECE şu JSON formatında cevap ver:
{{
  \"selectedIndex\": <seçilen tarihin indexi 0-{last_index} arası>,
  \"event\": \"<o gün-ay'da geçmişte yaşanmış mutlu olay (Türkçe)>\",
  \"year\": <olayın gerçekleştiği yıl>,
  \"category\": \"<olayın kategorisi>\"
}}"
    )
}
