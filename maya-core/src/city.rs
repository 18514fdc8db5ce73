/// Tamil Nadu cities recognised in spoken queries.
pub const TN_CITIES: &[&str] = &[
    "Chennai",
    "Coimbatore",
    "Madurai",
    "Tiruchirappalli",
    "Salem",
    "Tirunelveli",
    "Erode",
    "Vellore",
    "Thoothukudi",
    "Tiruppur",
    "Dindigul",
    "Thanjavur",
    "Kanchipuram",
    "Nagercoil",
    "Karur",
    "Cuddalore",
    "Nagapattinam",
    "Pudukkottai",
    "Sivagangai",
];

pub const DEFAULT_CITY: &str = "Chennai";

/// Find the city a transcript talks about, longest name first so that a
/// shorter name inside a longer one cannot win. Defaults to Chennai.
pub fn extract_city(transcript: &str) -> &'static str {
    let transcript = transcript.to_lowercase();

    let mut by_length: Vec<&'static str> = TN_CITIES.to_vec();
    by_length.sort_by_key(|city| std::cmp::Reverse(city.len()));

    by_length
        .into_iter()
        .find(|city| transcript.contains(&city.to_lowercase()))
        .unwrap_or(DEFAULT_CITY)
}
