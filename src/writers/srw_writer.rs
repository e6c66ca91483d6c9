use crate::error::Result;
use crate::models::GeoCoordinate;
use crate::utils::constants::EXPECTED_HOURS;
use crate::utils::format::{format_height, format_value};
use std::fs;
use std::path::Path;

/// The five header lines of a resource file.
#[derive(Debug, Clone)]
pub struct SrwHeader<'a> {
    pub city: &'a str,
    pub country: &'a str,
    pub coordinate: GeoCoordinate,
    pub project_name: &'a str,
    pub target_height: f64,
}

impl SrwHeader<'_> {
    /// Location line (latitude before longitude), project line, column
    /// labels, units and the elevation/height line.
    pub fn render(&self) -> String {
        let height = format_height(self.target_height);
        format!(
            "loc_id,city??,{city},{country},year??,lat??,lon??,{lat},{lon},{hours}\n\
             {project}\n\
             Temperature,Pressure,Direction,Speed\n\
             C,atm,degrees,m/s\n\
             2,0,{height},{height}\n",
            city = self.city,
            country = self.country,
            lat = format_value(self.coordinate.latitude),
            lon = format_value(self.coordinate.longitude),
            hours = EXPECTED_HOURS,
            project = self.project_name,
            height = height,
        )
    }
}

/// Header followed by the already rendered numeric table.
pub fn render_srw(header: &SrwHeader<'_>, table_text: &str) -> String {
    let mut srw = header.render();
    srw.push_str(table_text);
    srw
}

pub fn write_srw(path: &Path, header: &SrwHeader<'_>, table_text: &str) -> Result<()> {
    fs::write(path, render_srw(header, table_text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header() -> SrwHeader<'static> {
        SrwHeader {
            city: "Karachi",
            country: "Pakistan",
            coordinate: GeoCoordinate {
                longitude: 67.0011,
                latitude: 24.8607,
            },
            project_name: "FinalYearProject",
            target_height: 80.0,
        }
    }

    #[test]
    fn test_header_layout() {
        assert_eq!(
            header().render(),
            "loc_id,city??,Karachi,Pakistan,year??,lat??,lon??,24.8607,67.0011,8760\n\
             FinalYearProject\n\
             Temperature,Pressure,Direction,Speed\n\
             C,atm,degrees,m/s\n\
             2,0,80,80\n"
        );
    }

    #[test]
    fn test_body_follows_header_verbatim() {
        let body = "25.5,1.0,180.0,10.5\n";
        let srw = render_srw(&header(), body);

        assert!(srw.ends_with(body));
        assert_eq!(srw.lines().count(), 6);
        assert_eq!(srw.lines().nth(5), Some("25.5,1.0,180.0,10.5"));
    }
}
