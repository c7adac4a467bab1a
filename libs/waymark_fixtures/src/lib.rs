//! Static point-of-interest tables used by tests, benches and demo hosts.
//!
//! Coordinates are `(lng, lat)` in degrees. The tour walks the streets
//! around Jeonju's hanok village, starting from the visitor centre.

pub struct FixturePoi {
    pub id: &'static str,
    pub lng: f64,
    pub lat: f64,
    pub description: &'static str,
    pub image: &'static str,
}

pub const DEPARTURE: FixturePoi = FixturePoi {
    id: "Visitor Centre",
    lng: 127.150_321,
    lat: 35.815_102,
    description: "Starting point of the walk.",
    image: "images/visitor-centre.jpg",
};

pub const HANOK_TOUR: [FixturePoi; 6] = [
    FixturePoi {
        id: "Gyeonggijeon Shrine",
        lng: 127.149_778,
        lat: 35.815_467,
        description: "Royal portrait shrine of the Joseon founder.",
        image: "images/gyeonggijeon.jpg",
    },
    FixturePoi {
        id: "Jeondong Cathedral",
        lng: 127.149_093,
        lat: 35.813_283,
        description: "Romanesque cathedral built on a martyrdom site.",
        image: "images/jeondong.jpg",
    },
    FixturePoi {
        id: "Omokdae",
        lng: 127.155_234,
        lat: 35.812_051,
        description: "Hilltop pavilion overlooking the village roofs.",
        image: "images/omokdae.jpg",
    },
    FixturePoi {
        id: "Jeonju Hyanggyo",
        lng: 127.157_448,
        lat: 35.811_229,
        description: "Confucian school shaded by ginkgo trees.",
        image: "images/hyanggyo.jpg",
    },
    FixturePoi {
        id: "Pungnammun Gate",
        lng: 127.147_421,
        lat: 35.812_497,
        description: "Last surviving gate of the old city wall.",
        image: "images/pungnammun.jpg",
    },
    FixturePoi {
        id: "Nambu Market",
        lng: 127.146_102,
        lat: 35.813_950,
        description: "Traditional market with a night market on weekends.",
        image: "images/nambu.jpg",
    },
];
