//! Display names for the dawum party and institute ids.

const PARTIES: &[(u32, &str)] = &[
    (1, "CDU/CSU"),
    (2, "SPD"),
    (3, "Grüne"),
    (4, "FDP"),
    (5, "Linke"),
    (7, "AfD"),
    (801, "BSW"),
];

const INSTITUTES: &[(u32, &str)] = &[
    (1, "Infratest dimap (ARD)"),
    (2, "Forsa (RTL/n-tv)"),
    (3, "Forschungsgruppe Wahlen (ZDF)"),
    (4, "INSA (BILD)"),
    (5, "Allensbach (FAZ)"),
    (6, "GMS"),
    (8, "Ipsos"),
    (10, "Verian"),
    (14, "YouGov"),
];

#[derive(Debug, Clone, Copy)]
pub struct NameTables {
    pub parties: &'static [(u32, &'static str)],
    pub institutes: &'static [(u32, &'static str)],
}

impl Default for NameTables {
    fn default() -> Self {
        Self {
            parties: PARTIES,
            institutes: INSTITUTES,
        }
    }
}

fn lookup(table: &[(u32, &'static str)], id: u32) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == id).map(|(_, name)| *name)
}

impl NameTables {
    pub fn institute(&self, id: u32) -> Option<&'static str> {
        lookup(self.institutes, id)
    }

    pub fn institute_label(&self, id: u32) -> String {
        self.institute(id)
            .map_or_else(|| format!("Institut {id}"), str::to_string)
    }

    /// Party ids arrive as map keys, so they are looked up by their string form.
    pub fn party_label(&self, id: &str) -> String {
        id.trim()
            .parse()
            .ok()
            .and_then(|id| lookup(self.parties, id))
            .map_or_else(|| format!("Partei {id}"), str::to_string)
    }
}
