//! Staff pages.

use axum::response::Html;

use staffvault_core::{ListParams, ListResult};
use staffvault_core::html::{escape, notice, page};

use crate::model::{DATE_FORMAT, StaffForm, StaffRecord};

const NAV: &str = r#"<p><a href="/staff">All staff</a> | <a href="/staff/new">Add staff</a> | <a href="/staff/search">Search</a> | <a href="/logout">Log out</a></p>"#;

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn table(records: &[StaffRecord]) -> String {
    let mut out = String::from(
        "<table>\n<tr><th>First name</th><th>Last name</th><th>Position</th><th>Age</th>\
         <th>Salary</th><th>Years of service</th><th>Date of birth</th><th>Official car</th><th></th></tr>\n",
    );
    for r in records {
        out.push_str(&format!(
            r#"<tr><td>{first}</td><td>{last}</td><td>{position}</td><td>{age}</td><td>{salary}</td><td>{years}</td><td>{dob}</td><td>{car}</td><td><a href="/staff/{id}/edit">Edit</a> <form method="post" action="/staff/{id}/delete"><button type="submit">Delete</button></form></td></tr>
"#,
            first = escape(&r.first_name),
            last = escape(&r.last_name),
            position = escape(&r.position),
            age = r.age,
            salary = r.salary,
            years = r.years_of_service,
            dob = r.date_of_birth.format(DATE_FORMAT),
            car = yes_no(r.has_official_car),
            id = escape(&r.id),
        ));
    }
    out.push_str("</table>");
    out
}

pub fn list_page(result: &ListResult<StaffRecord>, params: &ListParams) -> Html<String> {
    let limit = params.effective_limit();
    let mut pager = Vec::new();
    if params.offset > 0 {
        pager.push(format!(
            r#"<a href="/staff?limit={}&amp;offset={}">Previous</a>"#,
            limit,
            params.offset.saturating_sub(limit)
        ));
    }
    if params.offset + result.items.len() < result.total {
        pager.push(format!(
            r#"<a href="/staff?limit={}&amp;offset={}">Next</a>"#,
            limit,
            params.offset + limit
        ));
    }

    let body = if result.items.is_empty() {
        format!("{}\n<p>No staff records yet.</p>", NAV)
    } else {
        format!(
            "{}\n<p>{} record(s)</p>\n{}\n<p>{}</p>",
            NAV,
            result.total,
            table(&result.items),
            pager.join(" ")
        )
    };
    page("Staff", &body)
}

pub fn form_page(title: &str, action: &str, message: Option<&str>, form: &StaffForm) -> Html<String> {
    let car = form.has_official_car.trim().to_ascii_lowercase();
    let has_car = matches!(car.as_str(), "true" | "on" | "yes" | "1");
    let no_car = matches!(car.as_str(), "false" | "off" | "no" | "0");

    let body = format!(
        r#"{nav}
{notice}
<form method="post" action="{action}">
  <label>First name <input name="first_name" value="{first}"></label>
  <label>Last name <input name="last_name" value="{last}"></label>
  <label>Position <input name="position" value="{position}"></label>
  <label>Age <input name="age" value="{age}"></label>
  <label>Salary <input name="salary" value="{salary}"></label>
  <label>Years of service <input name="years_of_service" value="{years}"></label>
  <label>Date of birth <input name="date_of_birth" type="date" value="{dob}"></label>
  <label>Official car <select name="has_official_car">
    <option value=""></option>
    <option value="yes"{yes}>yes</option>
    <option value="no"{no}>no</option>
  </select></label>
  <button type="submit">Save</button>
</form>"#,
        nav = NAV,
        notice = notice(message),
        action = escape(action),
        first = escape(&form.first_name),
        last = escape(&form.last_name),
        position = escape(&form.position),
        age = escape(&form.age),
        salary = escape(&form.salary),
        years = escape(&form.years_of_service),
        dob = escape(&form.date_of_birth),
        yes = if has_car { " selected" } else { "" },
        no = if no_car { " selected" } else { "" },
    );
    page(title, &body)
}

pub fn updated_page(record: &StaffRecord) -> Html<String> {
    let body = format!(
        "{}\n<p>{} {} updated successfully</p>",
        NAV,
        escape(&record.first_name),
        escape(&record.last_name)
    );
    page("Updated", &body)
}

pub fn search_page(first_name: &str, results: Option<&[StaffRecord]>) -> Html<String> {
    let found = match results {
        None => String::new(),
        Some([]) => "<p>No data relating to your search was found.</p>".to_string(),
        Some(records) => table(records),
    };
    let body = format!(
        r#"{nav}
<form method="get" action="/staff/search">
  <label>First name <input name="first_name" value="{first}"></label>
  <button type="submit">Search</button>
</form>
{found}"#,
        nav = NAV,
        first = escape(first_name),
        found = found,
    );
    page("Search staff", &body)
}
