//! Built-in sample dataset so the dashboard has something to show without files

/// Approximate yearly state of the Aral Sea (whole basin)
pub const ARAL_SEA_CSV: &str = "\
Year,Water_Level_m,Surface_Area_km2,Volume_km3,Salinity_g_l
1960,53.4,67499,1089,10
1965,52.5,64100,1030,10.5
1970,51.1,60400,970,11
1975,49.3,57200,860,14
1980,45.8,51700,700,17
1985,41.9,44500,540,23
1990,38.2,36500,330,29
1995,36.3,31000,260,37
2000,33.8,24000,160,60
2005,30.5,17400,110,80
2010,29.0,13900,95,100
2015,27.5,8600,75,110
2020,28.1,8300,73,115
";

pub const SAMPLE_NAME: &str = "aral_sea_sample.csv";

#[cfg(test)]
mod tests {
    use super::*;
    use dv_data::TextSource;

    #[test]
    fn test_sample_parses_cleanly() {
        let table = TextSource::new(SAMPLE_NAME, ARAL_SEA_CSV).load_blocking().unwrap();
        assert!(table.warnings.is_empty());
        assert_eq!(table.dataset.len(), 13);
        assert_eq!(table.dataset.numeric_dimensions().len(), 5);
        assert_eq!(table.dataset.value_dimensions().len(), 4);
    }
}
