//! Default item catalogue inserted on first start.

use super::items_model::NewItem;

const DEFAULT_ITEMS_TSV: &[&str] = &[
    "Rugbrød\tBrød",
    "Toastbrød\tBrød",
    "Pitabrød\tBrød",
    "Danskvand\tDrikkevarer",
    "Æblejuice (brik)\tDrikkevarer",
    "Frosne ærter\tFrost",
    "Pommes\tFrost",
    "Agurk\tFrugt og grønt",
    "Bananer\tFrugt og grønt",
    "Gulerødder\tFrugt og grønt",
    "Kartofler\tFrugt og grønt",
    "Løg\tFrugt og grønt",
    "Æbler\tFrugt og grønt",
    "Hakket oksekød\tKød",
    "Kyllingebryst\tKød",
    "Pålægssalami\tKød",
    "Letmælk\tMejeri",
    "Smør\tMejeri",
    "Skyr\tMejeri",
    "Revet ost\tMejeri",
    "Æg\tMejeri",
    "Havregryn\tKolonial",
    "Pasta\tKolonial",
    "Ris\tKolonial",
    "Hakkede tomater\tKolonial",
    "Kaffe\tKolonial",
    "Opvasketabs\tHusholdning",
    "Toiletpapir\tHusholdning",
    "Køkkenrulle\tHusholdning",
];

/// Returns the default catalogue. Malformed lines are skipped.
pub fn default_items() -> Vec<NewItem> {
    DEFAULT_ITEMS_TSV
        .iter()
        .filter_map(|line| {
            let (name, area) = line.split_once('\t')?;
            let (name, area) = (name.trim(), area.trim());
            if name.is_empty() || area.is_empty() {
                return None;
            }
            Some(NewItem::new(name, area))
        })
        .collect()
}
