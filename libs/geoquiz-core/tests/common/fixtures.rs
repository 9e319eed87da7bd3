//! Catalog sources shared by the integration tests.

/// Spanish catalog: three American, two European and one African country.
pub const COUNTRIES_ES: &str = "\
# nombre,capital,continente,iso
Estados Unidos,Washington D. C.,América,US
México,Ciudad de México,América,MX
Costa Rica,San José,América,CR
España,Madrid,Europa,ES
Reino Unido,Londres,Europa,GB
Botsuana,Gaborone,África,BW
";

/// English catalog with the same countries.
pub const COUNTRIES_EN: &str = "\
# name,capital,continent,iso
United States,Washington D.C.,America,US
Mexico,Mexico City,America,MX
Costa Rica,San Jose,America,CR
Spain,Madrid,Europe,ES
United Kingdom,London,Europe,GB
Botswana,Gaborone,Africa,BW
";
