/// Number of roulette slots every user owns
pub const ROULETTE_SLOT_COUNT: i32 = 12;

/// Longest reward text a slot can hold
pub const MAX_ROULETTE_TEXT_LENGTH: usize = 50;

/// Rewards seeded into a fresh user's wheel, slot 1 through 12
pub const DEFAULT_ROULETTE_TEXTS: [&str; 12] = [
    "Take a five minute walk",
    "Eat one piece of candy",
    "Stretch for three minutes",
    "Drink a glass of juice",
    "Watch animal videos for five minutes",
    "Listen to two favourite songs",
    "Read four pages of a favourite book",
    "Take a five minute nap",
    "Take three photos of whatever is around",
    "Write in a journal for five minutes",
    "Have a coffee or tea break",
    "Meditate for five minutes",
];
