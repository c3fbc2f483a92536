//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use dashboard_engine::{Dataset, Row};

pub struct RowBuilder(Row);

impl RowBuilder {
    pub fn new(date: &str) -> Self {
        Self(Row {
            channel_grouping: "Organic Search".to_string(),
            country: "Brazil".to_string(),
            date: NaiveDate::parse_from_str(date, "%m/%d/%Y").expect("fixture date"),
            page_title: "Home".to_string(),
            device_category: "desktop".to_string(),
            sessions: 0.0,
            bounces: 0.0,
            exits: 0.0,
            unique_pageviews: 0.0,
            page_load_time: 0.0,
            time_on_page: 0.0,
        })
    }

    pub fn channel(mut self, grouping: &str) -> Self {
        self.0.channel_grouping = grouping.to_string();
        self
    }

    pub fn country(mut self, country: &str) -> Self {
        self.0.country = country.to_string();
        self
    }

    pub fn page(mut self, title: &str) -> Self {
        self.0.page_title = title.to_string();
        self
    }

    pub fn device(mut self, device: &str) -> Self {
        self.0.device_category = device.to_string();
        self
    }

    pub fn sessions(mut self, sessions: f64) -> Self {
        self.0.sessions = sessions;
        self
    }

    pub fn bounces(mut self, bounces: f64) -> Self {
        self.0.bounces = bounces;
        self
    }

    pub fn exits(mut self, exits: f64) -> Self {
        self.0.exits = exits;
        self
    }

    pub fn unique_pageviews(mut self, pageviews: f64) -> Self {
        self.0.unique_pageviews = pageviews;
        self
    }

    pub fn page_load_time(mut self, seconds: f64) -> Self {
        self.0.page_load_time = seconds;
        self
    }

    pub fn time_on_page(mut self, seconds: f64) -> Self {
        self.0.time_on_page = seconds;
        self
    }

    pub fn build(self) -> Row {
        self.0
    }
}

pub const CSV_HEADER: &str = "Channel Grouping,Country,Date,Page Title,Device Category,Sessions,Bounces,Exits,Unique Pageviews,Page Load Time,Time on Page";

/// A small mixed dataset spanning two channels and two years
pub fn marketing_dataset() -> Dataset {
    let csv = format!(
        "{CSV_HEADER}\n\
         Organic Search,Brazil,01/05/2019,Home,desktop,10,2,3,50,1.5,40\n\
         Organic Search,India,01/25/2019,Pricing,mobile,20,4,5,40,2.5,60\n\
         Direct,Brazil,02/11/2019,Home,mobile,5,1,1,30,3.0,20\n\
         Direct,Chile,11/30/2018,Blog,desktop,8,3,2,12,4.0,10\n\
         Referral,Peru,03/02/2019,Blog,tablet,2,0,1,6,1.0,5\n"
    );
    Dataset::from_reader(csv.as_bytes()).expect("fixture csv")
}
