//! Burmese post text.
//!
//! Phrases are picked at random from fixed pools keyed by time of day,
//! condition and temperature band.

use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{city::burmese_name_for, condition::Condition, model::TimeOfDay};

const MORNING_GREETINGS: &[&str] = &[
    "မင်္ဂလာနံနက်ခင်းပါ",
    "နံနက်ခင်း မင်္ဂလာပါ",
    "နေကောင်းကြပါစေ",
];

const NIGHT_GREETINGS: &[&str] = &[
    "မင်္ဂလာညနေခင်းပါ",
    "ညနေခင်း မင်္ဂလာပါ",
    "ညနေစောင်းအချိန် မင်္ဂလာရှိပါစေ",
];

const CLEAR: &[&str] = &[
    "ကောင်းကင်ပြာလင်းနေပြီး နေရောင်ခြည် ပြည့်ဝနေပါတယ်",
    "နေရောင်ခြည် ထွန်းလင်းပြီး ရာသီဥတု သာယာနေပါတယ်",
    "မိုးကောင်းကင် ကြည်လင်ပြီး နေသာနေပါတယ်",
];
const CLOUDS: &[&str] = &[
    "မိုးတိမ်တွေ ဖုံးလွှမ်းနေပြီး အေးမြနေပါတယ်",
    "တိမ်တွေ ထူထပ်နေပေမယ့် မိုးရွာဖွယ် မရှိပါဘူး",
    "မိုးတိမ်တွေ ရှိနေပေမယ့် ရာသီဥတု သင့်တင့်နေပါတယ်",
];
const RAIN: &[&str] = &[
    "မိုးရွာသွန်းနေတာမို့ ထီးဆောင်းဖို့ မမေ့ပါနဲ့",
    "မိုးရွာနေပါတယ်၊ အပြင်ထွက်ရင် ထီးယူသွားဖို့ လိုပါမယ်",
    "မိုးရွာနေတာမို့ လမ်းတွေ စိုစွတ်နေပါတယ်",
];
const DRIZZLE: &[&str] = &[
    "မိုးဖွဲလေးတွေ ရွာနေပါတယ်၊ အပြင်ထွက်ရင် ထီးဆောင်းသင့်ပါတယ်",
    "မိုးဖွဲလေးတွေ ရွာနေပေမယ့် သိပ်မစိုပါဘူး",
    "မိုးဖွဲလေးတွေ ရွာနေတာမို့ လေထီးလေး ယူသွားပါ",
];
const THUNDERSTORM: &[&str] = &[
    "မိုးသက်မုန်တိုင်း ဖြစ်ပေါ်နေတာမို့ အပြင်မထွက်သင့်ပါဘူး",
    "မိုးကြိုးပစ်နေတာမို့ အိမ်ထဲမှာပဲ နေပါ",
    "မိုးသည်းထန်စွာရွာပြီး လျှပ်စီးလက်နေပါတယ်၊ သတိထားပါ",
];
const SNOW: &[&str] = &[
    "နှင်းကျနေတာမို့ နွေးနွေးထွေးထွေး ဝတ်ဆင်ပါ",
    "နှင်းပွင့်လေးတွေ ကျနေပြီး အလွန်အေးမြနေပါတယ်",
    "နှင်းကျနေတာမို့ လမ်းတွေ ချော်နိုင်ပါတယ်၊ သတိထားပါ",
];
const MIST: &[&str] = &[
    "မြူခိုးတွေ ဖုံးလွှမ်းနေတာမို့ မြင်ကွင်း မှုန်ဝါးနေပါတယ်",
    "မြူခိုးတွေကြောင့် ကားမောင်းရင် သတိထားပါ",
    "မြူခိုးတွေ ထူထပ်နေပြီး အမြင်အာရုံ ကန့်သတ်နေပါတယ်",
];
const FOG: &[&str] = &[
    "မြူထူထပ်နေတာမို့ ခရီးသွားရင် သတိထားပါ",
    "မြူထူနေတာမို့ မြင်ကွင်း မှုန်ဝါးနေပါတယ်",
    "မြူထူထပ်နေတာမို့ ယာဉ်မောင်းရင် အရှိန်လျှော့ပါ",
];
const HAZE: &[&str] = &[
    "မြူမှုန်တွေ ဖုံးလွှမ်းနေပြီး လေထုညစ်ညမ်းနေပါတယ်",
    "မြူမှုန်တွေကြောင့် မြင်ကွင်း မှုန်ဝါးနေပါတယ်",
    "မြူမှုန်တွေ ရှိနေတာမို့ နှာခေါင်းစည်း တပ်သင့်ပါတယ်",
];
const DUST: &[&str] = &[
    "ဖုန်မှုန့်တွေ လေထဲမှာ ပျံ့နှံ့နေတာမို့ နှာခေါင်းစည်း တပ်ပါ",
    "ဖုန်မှုန့်တွေ များနေတာမို့ အသက်ရှူလမ်းကြောင်း ဂရုစိုက်ပါ",
    "ဖုန်မှုန့်တွေကြောင့် လေထုညစ်ညမ်းနေပါတယ်",
];
const SMOKE: &[&str] = &[
    "မီးခိုးငွေ့တွေ လေထဲမှာ ရှိနေတာမို့ နှာခေါင်းစည်း တပ်ပါ",
    "မီးခိုးငွေ့တွေကြောင့် လေထုညစ်ညမ်းနေပါတယ်",
    "မီးခိုးငွေ့တွေ ရှိနေတာမို့ အပြင်ထွက်ရင် သတိထားပါ",
];

const HOT: &[&str] = &[
    "အပူချိန်မြင့်နေတာမို့ ရေများများသောက်ပါ",
    "နွေးနွေးပူပူရှိနေတာမို့ အရိပ်ထဲမှာ နေပါ",
    "အပူချိန်မြင့်နေတာမို့ နေရောင်ခြည်ဒဏ် သတိထားပါ",
];
const WARM: &[&str] = &[
    "အပူချိန်သင့်တင့်နေပြီး သက်တောင့်သက်သာ ရှိပါတယ်",
    "ရာသီဥတု သင့်တင့်နေပြီး အပြင်ထွက်ဖို့ ကောင်းပါတယ်",
    "အပူချိန်သင့်တင့်နေပြီး နေထိုင်ရ အဆင်ပြေပါတယ်",
];
const COOL: &[&str] = &[
    "အေးမြနေတာမို့ အကျႌလက်ရှည်လေး ဝတ်သင့်ပါတယ်",
    "လေအေးလေးတိုက်နေတာမို့ နွေးနွေးထွေးထွေး ဝတ်ပါ",
    "အပူချိန်နည်းနေတာမို့ ချမ်းလာနိုင်ပါတယ်",
];
const COLD: &[&str] = &[
    "အလွန်အေးမြနေတာမို့ နွေးနွေးထွေးထွေး ဝတ်ဆင်ပါ",
    "အပူချိန်အလွန်နိမ့်နေတာမို့ အပြင်ထွက်ရင် ဂရုစိုက်ပါ",
    "အေးလွန်းနေတာမို့ ဂျာကင်ထူထူလေး ဝတ်ပါ",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Hot,
    Warm,
    Cool,
    Cold,
}

impl TemperatureBand {
    pub fn for_temperature(celsius: i32) -> Self {
        if celsius > 30 {
            TemperatureBand::Hot
        } else if celsius > 25 {
            TemperatureBand::Warm
        } else if celsius > 15 {
            TemperatureBand::Cool
        } else {
            TemperatureBand::Cold
        }
    }

    fn phrases(&self) -> &'static [&'static str] {
        match self {
            TemperatureBand::Hot => HOT,
            TemperatureBand::Warm => WARM,
            TemperatureBand::Cool => COOL,
            TemperatureBand::Cold => COLD,
        }
    }
}

fn greetings(time: TimeOfDay) -> &'static [&'static str] {
    match time {
        TimeOfDay::Morning => MORNING_GREETINGS,
        TimeOfDay::Night => NIGHT_GREETINGS,
    }
}

fn condition_phrases(condition: Condition) -> &'static [&'static str] {
    match condition {
        Condition::Clear => CLEAR,
        Condition::Clouds => CLOUDS,
        Condition::Rain => RAIN,
        Condition::Drizzle => DRIZZLE,
        Condition::Thunderstorm => THUNDERSTORM,
        Condition::Snow => SNOW,
        Condition::Mist => MIST,
        Condition::Fog => FOG,
        Condition::Haze => HAZE,
        Condition::Dust => DUST,
        Condition::Smoke => SMOKE,
    }
}

/// Builds the Burmese sentence shown on a post card.
#[derive(Debug)]
pub struct Templater {
    rng: Mutex<StdRng>,
}

impl Templater {
    pub fn from_entropy() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    pub fn render(&self, city: &str, condition: Condition, time: TimeOfDay, temperature: i32) -> String {
        let mut rng = self.rng.lock();
        let greeting = greetings(time).choose(&mut *rng).copied().unwrap_or_default();
        let weather = condition_phrases(condition).choose(&mut *rng).copied().unwrap_or_default();
        let band = TemperatureBand::for_temperature(temperature)
            .phrases()
            .choose(&mut *rng)
            .copied()
            .unwrap_or_default();

        format!(
            "{greeting}! {} မြို့မှာ {weather}။ အပူချိန် {temperature}°C ရှိပြီး {band}။ ကောင်းမွန်သော နေ့တစ်နေ့ ဖြစ်ပါစေ။",
            burmese_name_for(city)
        )
    }
}

impl Default for Templater {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bands_use_strict_thresholds() {
        assert_eq!(TemperatureBand::for_temperature(31), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::for_temperature(30), TemperatureBand::Warm);
        assert_eq!(TemperatureBand::for_temperature(26), TemperatureBand::Warm);
        assert_eq!(TemperatureBand::for_temperature(25), TemperatureBand::Cool);
        assert_eq!(TemperatureBand::for_temperature(16), TemperatureBand::Cool);
        assert_eq!(TemperatureBand::for_temperature(15), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::for_temperature(-4), TemperatureBand::Cold);
    }

    #[test]
    fn render_assembles_all_parts() {
        let templater = Templater::seeded(7);
        let text = templater.render("Yangon", Condition::Rain, TimeOfDay::Morning, 33);

        assert!(text.contains("ရန်ကုန် မြို့မှာ"));
        assert!(text.contains("အပူချိန် 33°C"));
        assert!(MORNING_GREETINGS.iter().any(|g| text.starts_with(&format!("{g}!"))));
        assert!(RAIN.iter().any(|p| text.contains(p)));
        assert!(HOT.iter().any(|p| text.contains(p)));
        assert!(text.ends_with("ကောင်းမွန်သော နေ့တစ်နေ့ ဖြစ်ပါစေ။"));
    }

    #[test]
    fn night_greeting_and_cold_band() {
        let templater = Templater::seeded(1);
        let text = templater.render("Mae Sot", Condition::Fog, TimeOfDay::Night, 10);

        assert!(NIGHT_GREETINGS.iter().any(|g| text.starts_with(g)));
        assert!(FOG.iter().any(|p| text.contains(p)));
        assert!(COLD.iter().any(|p| text.contains(p)));
    }

    #[test]
    fn unknown_city_keeps_its_name() {
        let text = Templater::seeded(3).render("Osaka", Condition::Clear, TimeOfDay::Morning, 20);
        assert!(text.contains("Osaka မြို့မှာ"));
    }

    #[test]
    fn same_seed_same_text() {
        let a = Templater::seeded(42).render("Bangkok", Condition::Haze, TimeOfDay::Night, 28);
        let b = Templater::seeded(42).render("Bangkok", Condition::Haze, TimeOfDay::Night, 28);
        assert_eq!(a, b);
    }
}
