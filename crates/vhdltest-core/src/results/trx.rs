//! Visual Studio TRX report writer.

use crate::error::{Result, VhdlTestError};
use crate::results::test_results::TestResults;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

const TRX_NAMESPACE: &str = "http://microsoft.com/schemas/VisualStudio/TeamTest/2010";

/// Test type of a unit test in TRX documents.
const UNIT_TEST_TYPE: &str = "13CDC9D9-DDB5-4fa4-A97D-D965CCFC6D4B";

/// Identifier of the single synthetic test list.
const TEST_LIST_ID: &str = "19431567-8539-422a-85D7-44EE4E166BDA";

const TEST_LIST_NAME: &str = "All Loaded Results";

/// Render the aggregate as a TRX document.
pub fn to_trx(results: &TestResults, computer_name: &str) -> Result<String> {
    render(results, computer_name).map_err(|e| VhdlTestError::Report(e.to_string()))
}

fn render(results: &TestResults, computer_name: &str) -> quick_xml::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let run_id = results.run_id.to_string();
    let mut root = BytesStart::new("TestRun");
    root.push_attribute(("id", run_id.as_str()));
    root.push_attribute(("name", results.run_name.as_str()));
    root.push_attribute(("xmlns", TRX_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    start(&mut writer, "Results")?;
    for test in &results.tests {
        let execution_id = test.execution_id.to_string();
        let test_id = test.test_id.to_string();
        let duration = trx_duration(test.duration());
        let start_time = test.run_results.start.to_rfc3339();
        let end_time = test.run_results.end().to_rfc3339();
        let outcome = if test.failed() { "Failed" } else { "Passed" };

        let mut element = BytesStart::new("UnitTestResult");
        element.push_attribute(("executionId", execution_id.as_str()));
        element.push_attribute(("testId", test_id.as_str()));
        element.push_attribute(("testName", test.test_name.as_str()));
        element.push_attribute(("computerName", computer_name));
        element.push_attribute(("duration", duration.as_str()));
        element.push_attribute(("startTime", start_time.as_str()));
        element.push_attribute(("endTime", end_time.as_str()));
        element.push_attribute(("testType", UNIT_TEST_TYPE));
        element.push_attribute(("outcome", outcome));
        element.push_attribute(("testListId", TEST_LIST_ID));
        writer.write_event(Event::Start(element))?;

        start(&mut writer, "Output")?;
        start(&mut writer, "StdOut")?;
        cdata(&mut writer, &test.run_results.output)?;
        end(&mut writer, "StdOut")?;
        if test.failed() {
            start(&mut writer, "ErrorInfo")?;
            start(&mut writer, "Message")?;
            cdata(&mut writer, &test.error_message())?;
            end(&mut writer, "Message")?;
            end(&mut writer, "ErrorInfo")?;
        }
        end(&mut writer, "Output")?;

        end(&mut writer, "UnitTestResult")?;
    }
    end(&mut writer, "Results")?;

    start(&mut writer, "TestDefinitions")?;
    for test in &results.tests {
        let test_id = test.test_id.to_string();
        let execution_id = test.execution_id.to_string();

        let mut unit_test = BytesStart::new("UnitTest");
        unit_test.push_attribute(("name", test.test_name.as_str()));
        unit_test.push_attribute(("id", test_id.as_str()));
        writer.write_event(Event::Start(unit_test))?;

        let mut execution = BytesStart::new("Execution");
        execution.push_attribute(("id", execution_id.as_str()));
        writer.write_event(Event::Empty(execution))?;

        let mut method = BytesStart::new("TestMethod");
        method.push_attribute(("codeBase", results.code_base.as_str()));
        method.push_attribute(("className", test.class_name.as_str()));
        method.push_attribute(("name", test.test_name.as_str()));
        writer.write_event(Event::Empty(method))?;

        end(&mut writer, "UnitTest")?;
    }
    end(&mut writer, "TestDefinitions")?;

    start(&mut writer, "TestEntries")?;
    for test in &results.tests {
        let test_id = test.test_id.to_string();
        let execution_id = test.execution_id.to_string();
        let mut entry = BytesStart::new("TestEntry");
        entry.push_attribute(("testId", test_id.as_str()));
        entry.push_attribute(("executionId", execution_id.as_str()));
        entry.push_attribute(("testListId", TEST_LIST_ID));
        writer.write_event(Event::Empty(entry))?;
    }
    end(&mut writer, "TestEntries")?;

    start(&mut writer, "TestLists")?;
    let mut list = BytesStart::new("TestList");
    list.push_attribute(("name", TEST_LIST_NAME));
    list.push_attribute(("id", TEST_LIST_ID));
    writer.write_event(Event::Empty(list))?;
    end(&mut writer, "TestLists")?;

    let mut summary = BytesStart::new("ResultSummary");
    summary.push_attribute(("outcome", "Completed"));
    writer.write_event(Event::Start(summary))?;
    let total = results.total().to_string();
    let passed = results.passed_count().to_string();
    let failed = results.failed_count().to_string();
    let mut counters = BytesStart::new("Counters");
    counters.push_attribute(("total", total.as_str()));
    counters.push_attribute(("executed", total.as_str()));
    counters.push_attribute(("passed", passed.as_str()));
    counters.push_attribute(("failed", failed.as_str()));
    writer.write_event(Event::Empty(counters))?;
    end(&mut writer, "ResultSummary")?;

    start(&mut writer, "Output")?;
    start(&mut writer, "StdOut")?;
    cdata(&mut writer, &run_output(results))?;
    end(&mut writer, "StdOut")?;
    end(&mut writer, "Output")?;

    end(&mut writer, "TestRun")?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Build lines followed by each test's raw output, one per line.
fn run_output(results: &TestResults) -> String {
    let mut text = String::new();
    if let Some(build) = &results.build_results {
        for line in &build.lines {
            text.push_str(&line.text);
            text.push('\n');
        }
    }
    for test in &results.tests {
        text.push_str(&test.run_results.output);
        text.push('\n');
    }
    text
}

/// Format seconds as `hh:mm:ss.fffffff`.
fn trx_duration(seconds: f64) -> String {
    let ticks = (seconds.max(0.0) * 10_000_000.0).round() as u64;
    let fraction = ticks % 10_000_000;
    let total_secs = ticks / 10_000_000;
    format!(
        "{:02}:{:02}:{:02}.{:07}",
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60,
        fraction
    )
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

/// Write text as CDATA, splitting around any `]]>` terminator.
fn cdata(writer: &mut Writer<Vec<u8>>, text: &str) -> quick_xml::Result<()> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;
    for (index, part) in parts.iter().enumerate() {
        let mut section = String::with_capacity(part.len() + 3);
        if index > 0 {
            section.push('>');
        }
        section.push_str(part);
        if index < last {
            section.push_str("]]");
        }
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    Ok(())
}
