pub const CARD_INSTRUCTION: &str = "Analyse this business card. Extract the first name, last name, \
job title, company, email, phone number, website and LinkedIn URL. Leave a field empty when it \
is not printed on the card. Return JSON only.";
