use getset::Getters;
use ikuuu_checkin_utils::selector;
use scraper::{ElementRef, Html};

/// Heading of the statistic card that shows the remaining traffic.
pub const REMAINING_QUOTA_HEADING: &str = "剩余流量";

#[derive(Clone, PartialEq, Eq, Debug, Getters)]
#[getset(get = "pub")]
pub struct Quota {
    value: String,
    unit: String,
}
impl Quota {
    pub fn new(value: String, unit: String) -> Self {
        Self { value, unit }
    }
}

/// Finds the remaining quota in the user page.
/// `None` means the page does not carry a recognizable quota card, which is not an error.
/// Only the first heading-matching card that has a counter is read;
/// an empty counter there means no quota rather than a reason to look further.
pub fn parse(html: &Html) -> Option<Quota> {
    let (card, counter) = html
        .select(selector!("div.card.card-statistic-2"))
        .filter(is_remaining_quota_card)
        .find_map(|card| {
            let counter = card.select(selector!("span.counter")).next()?;
            Some((card, counter))
        })?;
    parse_counter(card, counter)
}

fn is_remaining_quota_card(card: &ElementRef) -> bool {
    card.select(selector!("h4"))
        .next()
        .is_some_and(|h4| h4.text().collect::<String>().contains(REMAINING_QUOTA_HEADING))
}

fn parse_counter(card: ElementRef, counter: ElementRef) -> Option<Quota> {
    let value = counter.text().collect::<String>().trim().to_owned();
    if value.is_empty() {
        return None;
    }
    let trailing = counter
        .next_sibling()
        .and_then(|node| node.value().as_text().map(|text| text.trim().to_owned()))
        .unwrap_or_default();
    let unit = if trailing.is_empty() {
        card.select(selector!("small"))
            .next()
            .map(|small| small.text().collect::<String>().trim().to_owned())
            .unwrap_or_default()
    } else {
        trailing
    };
    Some(Quota { value, unit })
}
