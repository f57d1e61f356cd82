use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// Caller-facing city code. The set is closed; every code maps to exactly one
/// provider location name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CityCode {
    Taipei,
    NewTaipei,
    Taoyuan,
    Taichung,
    Tainan,
    Kaohsiung,
    Keelung,
    HsinchuCity,
    HsinchuCounty,
    Miaoli,
    Changhua,
    Nantou,
    Yunlin,
    ChiayiCity,
    ChiayiCounty,
    Pingtung,
    Yilan,
    Hualien,
    Taitung,
    Penghu,
    Kinmen,
    Lienchiang,
}

/// Returned when a string is not one of the supported city codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown city code '{0}'")]
pub struct UnknownCity(pub String);

impl CityCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityCode::Taipei => "taipei",
            CityCode::NewTaipei => "new-taipei",
            CityCode::Taoyuan => "taoyuan",
            CityCode::Taichung => "taichung",
            CityCode::Tainan => "tainan",
            CityCode::Kaohsiung => "kaohsiung",
            CityCode::Keelung => "keelung",
            CityCode::HsinchuCity => "hsinchu-city",
            CityCode::HsinchuCounty => "hsinchu-county",
            CityCode::Miaoli => "miaoli",
            CityCode::Changhua => "changhua",
            CityCode::Nantou => "nantou",
            CityCode::Yunlin => "yunlin",
            CityCode::ChiayiCity => "chiayi-city",
            CityCode::ChiayiCounty => "chiayi-county",
            CityCode::Pingtung => "pingtung",
            CityCode::Yilan => "yilan",
            CityCode::Hualien => "hualien",
            CityCode::Taitung => "taitung",
            CityCode::Penghu => "penghu",
            CityCode::Kinmen => "kinmen",
            CityCode::Lienchiang => "lienchiang",
        }
    }

    /// Location name exactly as the upstream provider spells it.
    pub fn name(&self) -> &'static str {
        match self {
            CityCode::Taipei => "臺北市",
            CityCode::NewTaipei => "新北市",
            CityCode::Taoyuan => "桃園市",
            CityCode::Taichung => "臺中市",
            CityCode::Tainan => "臺南市",
            CityCode::Kaohsiung => "高雄市",
            CityCode::Keelung => "基隆市",
            CityCode::HsinchuCity => "新竹市",
            CityCode::HsinchuCounty => "新竹縣",
            CityCode::Miaoli => "苗栗縣",
            CityCode::Changhua => "彰化縣",
            CityCode::Nantou => "南投縣",
            CityCode::Yunlin => "雲林縣",
            CityCode::ChiayiCity => "嘉義市",
            CityCode::ChiayiCounty => "嘉義縣",
            CityCode::Pingtung => "屏東縣",
            CityCode::Yilan => "宜蘭縣",
            CityCode::Hualien => "花蓮縣",
            CityCode::Taitung => "臺東縣",
            CityCode::Penghu => "澎湖縣",
            CityCode::Kinmen => "金門縣",
            CityCode::Lienchiang => "連江縣",
        }
    }

    pub const fn all() -> &'static [CityCode] {
        &[
            CityCode::Taipei,
            CityCode::NewTaipei,
            CityCode::Taoyuan,
            CityCode::Taichung,
            CityCode::Tainan,
            CityCode::Kaohsiung,
            CityCode::Keelung,
            CityCode::HsinchuCity,
            CityCode::HsinchuCounty,
            CityCode::Miaoli,
            CityCode::Changhua,
            CityCode::Nantou,
            CityCode::Yunlin,
            CityCode::ChiayiCity,
            CityCode::ChiayiCounty,
            CityCode::Pingtung,
            CityCode::Yilan,
            CityCode::Hualien,
            CityCode::Taitung,
            CityCode::Penghu,
            CityCode::Kinmen,
            CityCode::Lienchiang,
        ]
    }

    /// Query path a client uses to fetch this city's forecast.
    pub fn query_path(&self) -> String {
        format!("/api/weather/{}", self.as_str())
    }
}

impl fmt::Display for CityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityCode {
    type Err = UnknownCity;

    /// Exact, case-sensitive match.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CityCode::all()
            .iter()
            .copied()
            .find(|code| code.as_str() == value)
            .ok_or_else(|| UnknownCity(value.to_string()))
    }
}

/// Resolve a caller-supplied code to the provider location name.
pub fn resolve(code: &str) -> Result<&'static str, UnknownCity> {
    code.parse::<CityCode>().map(|city| city.name())
}

/// Every supported code, in directory order.
pub fn valid_codes() -> Vec<&'static str> {
    CityCode::all().iter().map(CityCode::as_str).collect()
}

/// One row of the discovery listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub path: String,
}

impl From<CityCode> for CityEntry {
    fn from(city: CityCode) -> Self {
        Self { code: city.as_str(), name: city.name(), path: city.query_path() }
    }
}
