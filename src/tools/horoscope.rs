use serde_json::Value;
use tracing::debug;

use super::{ParamKind, Tool, ToolDescriptor, ToolFuture, ToolOutput};

pub const HOROSCOPE_FALLBACK: &str =
    "The stars are hazy for that sign today. Try again with one of the twelve zodiac signs.";

const HOROSCOPES: [(&str, &str); 12] = [
    (
        "aries",
        "Aries: charge ahead, but maybe let someone else open the door first today.",
    ),
    (
        "taurus",
        "Taurus: a small indulgence pays off. The second slice of cake is cosmically approved.",
    ),
    (
        "gemini",
        "Gemini: both of you agree that today is a great day to start a conversation.",
    ),
    (
        "cancer",
        "Cancer: home is where the snacks are. Stay cozy and let the tide come to you.",
    ),
    (
        "leo",
        "Leo: the spotlight finds you before lunch. Wear the good sunglasses.",
    ),
    (
        "virgo",
        "Virgo: that spreadsheet finally balances. Treat yourself to a fresh label maker.",
    ),
    (
        "libra",
        "Libra: a decision you have weighed for weeks tips gently in your favor.",
    ),
    (
        "scorpio",
        "Scorpio: a secret works in your favor. Keep your poker face on until Friday.",
    ),
    (
        "sagittarius",
        "Sagittarius: adventure calls, even if it is just a new route to the coffee shop.",
    ),
    (
        "capricorn",
        "Capricorn: steady climbing brings a view worth the effort. Pack water.",
    ),
    (
        "aquarius",
        "Aquarius: next Tuesday you will befriend a baby otter.",
    ),
    (
        "pisces",
        "Pisces: go with the flow today. A daydream turns into a surprisingly good plan.",
    ),
];

/// Returns the fixed horoscope for `sign`, or [`HOROSCOPE_FALLBACK`].
pub fn horoscope_for(sign: &str) -> &'static str {
    let sign = sign.trim();
    HOROSCOPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sign))
        .map(|(_, text)| *text)
        .unwrap_or(HOROSCOPE_FALLBACK)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HoroscopeTool;

impl Tool for HoroscopeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("get_horoscope", "Get today's horoscope for an astrological sign.")
            .required(
                "sign",
                ParamKind::String,
                "An astrological sign like Taurus or Aquarius.",
            )
    }

    // Never fails: a missing or non-string sign gets the fallback text.
    fn invoke<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a> {
        Box::pin(async move {
            let sign = arguments
                .get("sign")
                .and_then(Value::as_str)
                .unwrap_or_default();
            debug!(sign = %sign, "reading horoscope");
            Ok(ToolOutput::new(horoscope_for(sign)))
        })
    }
}
