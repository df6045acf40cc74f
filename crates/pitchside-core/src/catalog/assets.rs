// Image asset URLs for players and clubs.

/// Kit code used when a club is unknown.
const FALLBACK_SHIRT_CODE: u32 = 3;

/// Shirt image for a club kit code; goalkeepers wear the `_1` variant.
/// A missing or zero code gets the fallback kit.
pub fn shirt_url(club_code: Option<u32>, is_goalkeeper: bool) -> String {
    let code = club_code
        .filter(|&c| c != 0)
        .unwrap_or(FALLBACK_SHIRT_CODE);
    let variant = if is_goalkeeper { "_1" } else { "" };
    format!("https://fantasy.premierleague.com/dist/img/shirts/standard/shirt_{code}{variant}-66.png")
}

/// Player headshot, or `None` when the player has no photo code.
pub fn player_photo_url(player_code: u32) -> Option<String> {
    if player_code == 0 {
        return None;
    }
    Some(format!(
        "https://resources.premierleague.com/premierleague/photos/players/110x140/p{player_code}.png"
    ))
}

/// Club badge, or `None` when the club has no badge code.
pub fn badge_url(club_code: u32) -> Option<String> {
    if club_code == 0 {
        return None;
    }
    Some(format!(
        "https://resources.premierleague.com/premierleague/badges/t{club_code}.png"
    ))
}
