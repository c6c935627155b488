#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CatalogEntry {
    pub(crate) id: u32,
    pub(crate) name: &'static str,
}

pub(crate) const CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        id: 25544,
        name: "ISS (ZARYA)",
    },
    CatalogEntry {
        id: 20580,
        name: "HUBBLE SPACE TELESCOPE",
    },
    CatalogEntry {
        id: 43226,
        name: "STARLINK-1007",
    },
    CatalogEntry {
        id: 28654,
        name: "GPS BIIR-13",
    },
];
