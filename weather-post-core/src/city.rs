use std::{fmt, str::FromStr};

/// Cities the post generator publishes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Yangon,
    Mandalay,
    NayPyiTaw,
    NewDelhi,
    Bangkok,
    ChiangMai,
    MaeSot,
}

impl City {
    pub const fn all() -> &'static [City] {
        &[
            City::Yangon,
            City::Mandalay,
            City::NayPyiTaw,
            City::NewDelhi,
            City::Bangkok,
            City::ChiangMai,
            City::MaeSot,
        ]
    }

    /// Name as sent to the weather provider.
    pub fn name(&self) -> &'static str {
        match self {
            City::Yangon => "Yangon",
            City::Mandalay => "Mandalay",
            City::NayPyiTaw => "Nay Pyi Taw",
            City::NewDelhi => "New Delhi",
            City::Bangkok => "Bangkok",
            City::ChiangMai => "Chiang Mai",
            City::MaeSot => "Mae Sot",
        }
    }

    pub fn burmese_name(&self) -> &'static str {
        match self {
            City::Yangon => "ရန်ကုန်",
            City::Mandalay => "မန္တလေး",
            City::NayPyiTaw => "နေပြည်တော်",
            City::NewDelhi => "နယူးဒေလီ",
            City::Bangkok => "ဘန်ကောက်",
            City::ChiangMai => "ချင်းမိုင်",
            City::MaeSot => "မဲဆော့",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(value);
        City::all()
            .iter()
            .copied()
            .find(|city| normalize(city.name()) == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = City::all().iter().map(City::name).collect();
                anyhow::anyhow!("Unknown city '{value}'. Supported cities: {}.", known.join(", "))
            })
    }
}

/// Burmese name of a known city, or the input unchanged.
pub fn burmese_name_for(city: &str) -> String {
    city.parse::<City>()
        .map(|c| c.burmese_name().to_string())
        .unwrap_or_else(|_| city.to_string())
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
