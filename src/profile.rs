use std::{fmt, str::FromStr};

/// CGMES 2.4.15 profiles.
///
/// The declaration order is the export priority: Equipment first, the
/// rest alphabetically by short name. `Ord` follows it, and so does every
/// "first profile" decision made by the writer.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Profile {
    EQ,
    DL,
    DY,
    EQBD,
    GL,
    SSH,
    SV,
    TP,
    TPBD,
}

impl Profile {
    pub const ALL: [Profile; 9] = [
        Profile::EQ,
        Profile::DL,
        Profile::DY,
        Profile::EQBD,
        Profile::GL,
        Profile::SSH,
        Profile::SV,
        Profile::TP,
        Profile::TPBD,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Profile::EQ => "EQ",
            Profile::DL => "DL",
            Profile::DY => "DY",
            Profile::EQBD => "EQ_BD",
            Profile::GL => "GL",
            Profile::SSH => "SSH",
            Profile::SV => "SV",
            Profile::TP => "TP",
            Profile::TPBD => "TP_BD",
        }
    }

    /// Name used for output files: `<stem>_<long_name>.xml`.
    pub fn long_name(self) -> &'static str {
        match self {
            Profile::EQ => "Equipment",
            Profile::DL => "DiagramLayout",
            Profile::DY => "Dynamics",
            Profile::EQBD => "EquipmentBoundary",
            Profile::GL => "GeographicalLocation",
            Profile::SSH => "SteadyStateHypothesis",
            Profile::SV => "StateVariables",
            Profile::TP => "Topology",
            Profile::TPBD => "TopologyBoundary",
        }
    }

    /// Canonical `md:Model.profile` URIs.
    pub fn uris(self) -> &'static [&'static str] {
        match self {
            Profile::EQ => &[
                "http://entsoe.eu/CIM/EquipmentCore/3/1",
                "http://entsoe.eu/CIM/EquipmentOperation/3/1",
                "http://entsoe.eu/CIM/EquipmentShortCircuit/3/1",
            ],
            Profile::DL => &["http://entsoe.eu/CIM/DiagramLayout/3/1"],
            Profile::DY => &["http://entsoe.eu/CIM/Dynamics/3/1"],
            Profile::EQBD => &[
                "http://entsoe.eu/CIM/EquipmentBoundary/3/1",
                "http://entsoe.eu/CIM/EquipmentBoundaryOperation/3/1",
            ],
            Profile::GL => &["http://entsoe.eu/CIM/GeographicalLocation/2/1"],
            Profile::SSH => &["http://entsoe.eu/CIM/SteadyStateHypothesis/1/1"],
            Profile::SV => &["http://entsoe.eu/CIM/StateVariables/4/1"],
            Profile::TP => &["http://entsoe.eu/CIM/Topology/4/1"],
            Profile::TPBD => &["http://entsoe.eu/CIM/TopologyBoundary/3/1"],
        }
    }

    pub fn from_uri(uri: &str) -> Option<Profile> {
        Profile::ALL
            .iter()
            .copied()
            .find(|p| p.uris().iter().any(|u| *u == uri))
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownProfile(pub String);

impl fmt::Display for UnknownProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown profile: {}", self.0)
    }
}

impl std::error::Error for UnknownProfile {}

impl FromStr for Profile {
    type Err = UnknownProfile;

    /// Accepts short names (`EQ`, `EQ_BD`, `EQBD`) and long names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .iter()
            .copied()
            .find(|p| {
                s.eq_ignore_ascii_case(p.short_name())
                    || s.eq_ignore_ascii_case(&format!("{:?}", p))
                    || s.eq_ignore_ascii_case(p.long_name())
            })
            .ok_or_else(|| UnknownProfile(s.to_string()))
    }
}

/// A set of profiles, iterated in `Profile` order.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct ProfileSet(u16);

impl ProfileSet {
    pub const EMPTY: ProfileSet = ProfileSet(0);

    pub const fn of(profiles: &[Profile]) -> ProfileSet {
        let mut bits = 0;
        let mut i = 0;
        while i < profiles.len() {
            bits |= profiles[i].bit();
            i += 1;
        }
        ProfileSet(bits)
    }

    pub fn contains(self, profile: Profile) -> bool {
        self.0 & profile.bit() != 0
    }

    pub fn insert(&mut self, profile: Profile) {
        self.0 |= profile.bit()
    }

    pub fn union(self, other: ProfileSet) -> ProfileSet {
        ProfileSet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Lowest profile in `Profile` order.
    pub fn first(self) -> Option<Profile> {
        self.iter().next()
    }

    pub fn iter(self) -> impl Iterator<Item = Profile> {
        Profile::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl fmt::Debug for ProfileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Profile> for ProfileSet {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        let mut set = ProfileSet::EMPTY;
        for p in iter {
            set.insert(p);
        }
        set
    }
}
